use clap::Parser;
use contactdesk::cli::{
    run_add, run_browse, run_config, run_delete, run_favorite, run_list, run_login, run_logout,
    run_register, run_show, run_update, run_whoami, Cli, Commands, ListArgs,
};
use contactdesk::App;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut app = App::open()?;

    match cli.command {
        None => {
            // No subcommand: first page of contacts, or a hint when signed out
            if app.auth.is_logged_in() {
                run_list(
                    &mut app,
                    ListArgs {
                        page: 1,
                        limit: None,
                        search: None,
                        sort: None,
                        order: None,
                        tags: None,
                        favorites: false,
                    },
                )?;
            } else {
                println!("Not logged in. Run `contactdesk login` or `contactdesk register`.");
            }
        }
        Some(Commands::Login(args)) => run_login(&mut app, args.email, args.password)?,
        Some(Commands::Register(args)) => {
            run_register(&mut app, args.email, args.password, args.name)?
        }
        Some(Commands::Logout) => run_logout(&mut app)?,
        Some(Commands::Whoami) => run_whoami(&app)?,
        Some(Commands::List(args)) => run_list(&mut app, args)?,
        Some(Commands::Browse(args)) => run_browse(&mut app, args.search, args.favorites)?,
        Some(Commands::Show(args)) => run_show(&mut app, &args.id)?,
        Some(Commands::Add(args)) => run_add(&mut app, args.fields.into(), args.favorite)?,
        Some(Commands::Update(args)) => run_update(&mut app, &args.id, args.fields.into())?,
        Some(Commands::Delete(args)) => run_delete(&mut app, &args.id, args.yes)?,
        Some(Commands::Favorite(args)) => run_favorite(&mut app, &args.id)?,
        Some(Commands::Config(args)) => {
            run_config(&mut app, args.api_url, args.page_size, args.reset)?
        }
    }

    Ok(())
}
