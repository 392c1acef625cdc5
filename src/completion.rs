//! # Shell Completion Module
//!
//! ```bash
//! tuneprint completion bash > ~/.local/share/bash-completion/completions/tuneprint
//! tuneprint completion zsh > ~/.config/zsh/completions/_tuneprint
//! tuneprint completion fish > ~/.config/fish/completions/tuneprint.fish
//! ```

use crate::cli::Shell;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io::Write;

/// Write completions for `cmd` to `out`
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(gen, cmd, name, out);
}

#[must_use]
pub const fn shell_to_completion_shell(shell: Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::CommandFactory;

    #[test]
    fn test_shell_conversion() {
        assert_eq!(shell_to_completion_shell(Shell::Bash), CompletionShell::Bash);
        assert_eq!(shell_to_completion_shell(Shell::Zsh), CompletionShell::Zsh);
        assert_eq!(shell_to_completion_shell(Shell::PowerShell), CompletionShell::PowerShell);
    }

    #[test]
    fn test_bash_script_mentions_subcommands() {
        let mut cmd = Args::command();
        let mut buffer: Vec<u8> = Vec::new();
        generate_completions(shell_to_completion_shell(Shell::Bash), &mut cmd, &mut buffer);

        let script = String::from_utf8(buffer).unwrap();
        assert!(script.contains("tuneprint"));
        assert!(script.contains("analyze"));
        assert!(script.contains("compare"));
    }
}
