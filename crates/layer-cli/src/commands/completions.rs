//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::{Shell as Generator, generate};

use crate::cli::{Cli, CompletionsArgs, Shell};

pub fn execute(args: CompletionsArgs) -> crate::error::CliResult<()> {
    let mut cmd = Cli::command();
    generate(generator(args.shell), &mut cmd, "layer", &mut std::io::stdout());
    Ok(())
}

fn generator(shell: Shell) -> Generator {
    match shell {
        Shell::Bash => Generator::Bash,
        Shell::Zsh => Generator::Zsh,
        Shell::Fish => Generator::Fish,
        Shell::PowerShell => Generator::PowerShell,
        Shell::Elvish => Generator::Elvish,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_completes_subcommands() {
        let mut cmd = Cli::command();
        let mut buf = Vec::new();
        generate(generator(Shell::Bash), &mut cmd, "layer", &mut buf);

        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("layer"));
        assert!(script.contains("generate"));
    }
}
