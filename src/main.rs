use clap::Parser;

fn main() -> miette::Result<()> {
    plotme::App::parse().run()
}
