use clap::Parser;
use miette::Result;
use reorder_tree::cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    // Terminate silently on a closed pipe (`reorder-tree plan x | head`)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Run(args) => commands::run::run(args, &global),
        Commands::Plan(args) => commands::plan::run(args, &global),
        Commands::Renumber(args) => commands::renumber::run(args, &global),
        Commands::Groups(args) => commands::groups::run(args, &global),
        Commands::Config(cmd) => commands::config::run(cmd, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
