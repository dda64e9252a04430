use crate::cli::Command;
use mkimport::Result;

pub mod build;
pub mod list;

pub async fn dispatch(cli: crate::cli::Cli) -> Result<()> {
    match cli.command {
        Command::Build(args) => build::run(args).await,
        Command::List(args) => list::run(args),
    }
}
