use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    slipstream completions bash > ~/.bash_completion.d/slipstream\n\n\
                  Generate zsh completions:\n    slipstream completions zsh > ~/.zfunc/_slipstream\n\n\
                  Generate fish completions:\n    slipstream completions fish > ~/.config/fish/completions/slipstream.fish\n\n\
                  Generate PowerShell completions:\n    slipstream completions powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
