mod command;
mod sink;
mod tui;
mod ui;

fn main() -> anyhow::Result<()> {
    command::run()
}
