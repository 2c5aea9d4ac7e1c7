mod command;
mod logging;
mod store;
mod tui;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
