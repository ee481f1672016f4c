use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use buildsite_client::{
    BackendApi, ClientConfig, ClientError, ContentRepository, DeleteOutcome, FileStore,
    ImageUpload, SessionHolder,
};
use buildsite_core::about::AboutContent;
use buildsite_core::availability::parse_calendar_day;
use buildsite_core::contact::NewContact;
use buildsite_core::project::{NewProject, UpdateProject};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "buildsite-admin")]
#[command(about = "Manage projects, about text, availability and contact submissions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session.
    Login {
        username: String,
        #[arg(long, env = "BUILDSITE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    Projects,
    CreateProject {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value_t = 0)]
        order: i32,
    },
    UpdateProject {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        order: Option<i32>,
    },
    DeleteProject {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    UploadImage {
        project_id: String,
        file: PathBuf,
    },
    DeleteImage {
        project_id: String,
        index: usize,
        #[arg(long)]
        yes: bool,
    },
    About,
    SetAbout {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    Contacts,
    /// Submit the public contact form.
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        message: String,
    },
    /// List busy days.
    Availability,
    /// Toggle each day between busy and available, then save.
    ToggleBusy {
        #[arg(required = true)]
        dates: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "buildsite_admin=info,buildsite_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ClientError>() {
                Some(client_err) => eprintln!("error: {}", client_err.user_message()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(api_url = %config.api_url(), "Loaded client configuration");

    let api = BackendApi::new(&config)?;
    let store = FileStore::open(&config.session_file)?;
    let mut repo = ContentRepository::new(api, SessionHolder::init(store)?);

    // A failed login leaves any existing session alone.
    let guards_session = !matches!(command, Command::Login { .. });
    let result = execute(&mut repo, command).await;
    if let Err(err) = &result {
        if let Some(client_err) = err.downcast_ref::<ClientError>() {
            if guards_session && repo.discard_rejected_session(client_err) {
                eprintln!("Session expired; log in again");
            }
        }
    }
    result
}

async fn execute(repo: &mut ContentRepository<FileStore>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            let session = repo.login(&username, &password).await?;
            println!("Logged in as {}", session.username);
        }
        Command::Logout => {
            repo.logout()?;
            println!("Logged out");
        }
        Command::Whoami => match repo.session().username() {
            Some(username) => println!("{username}"),
            None => println!("Not logged in"),
        },
        Command::Projects => {
            for project in repo.list_projects().await? {
                println!(
                    "{}\t{}\torder={}\timages={}",
                    project.id,
                    project.title,
                    project.order,
                    project.images.len()
                );
                for (index, image) in project.images.iter().enumerate() {
                    println!("\t[{index}] {image}");
                }
            }
        }
        Command::CreateProject {
            title,
            description,
            order,
        } => {
            let created = repo
                .create_project(&NewProject::new(title, description, order))
                .await?;
            println!("Created project {}", created.id);
        }
        Command::UpdateProject {
            id,
            title,
            description,
            order,
        } => {
            let update = UpdateProject {
                title,
                description,
                order,
            };
            let updated = repo.update_project(&id, &update).await?;
            println!("Updated project {}", updated.id);
        }
        Command::DeleteProject { id, yes } => {
            let outcome = repo.delete_project(&id, &prompt(yes)).await?;
            report(outcome, "Project deleted");
        }
        Command::UploadImage { project_id, file } => {
            let upload = ImageUpload::from_path(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let project = repo.upload_image(&project_id, upload).await?;
            println!("Project {} now has {} image(s)", project.id, project.images.len());
        }
        Command::DeleteImage {
            project_id,
            index,
            yes,
        } => {
            let project = repo
                .list_projects()
                .await?
                .into_iter()
                .find(|p| p.id == project_id)
                .ok_or_else(|| ClientError::NotFound(format!("project {project_id}")))?;
            let outcome = repo.delete_image(&project, index, &prompt(yes)).await?;
            report(outcome, "Image deleted");
        }
        Command::About => {
            let about = repo.get_about().await?;
            println!("{}\n\n{}", about.title, about.content);
        }
        Command::SetAbout { title, content } => {
            repo.update_about(&AboutContent::new(title, content)).await?;
            println!("About section updated");
        }
        Command::Contacts => {
            for contact in repo.list_contacts().await? {
                println!(
                    "{}\t{} <{}>\t{}\t{}",
                    contact.submitted_at.format("%Y-%m-%d %H:%M"),
                    contact.name,
                    contact.email,
                    contact.phone.as_deref().unwrap_or("-"),
                    contact.message
                );
            }
        }
        Command::Contact {
            name,
            email,
            phone,
            message,
        } => {
            repo.submit_contact(&NewContact::new(name, email, phone, message))
                .await?;
            println!("Thank you! We'll get back to you soon.");
        }
        Command::Availability => {
            for day in repo.fetch_busy_dates().await?.iter() {
                println!("{day}");
            }
        }
        Command::ToggleBusy { dates } => {
            let mut busy = repo.fetch_busy_dates().await?;
            for raw in &dates {
                let day = parse_calendar_day(raw)
                    .with_context(|| format!("not a calendar day: {raw}"))?;
                let now_busy = busy.toggle(day);
                println!("{day}: {}", if now_busy { "busy" } else { "available" });
            }
            repo.save_busy_dates(&busy).await?;
            println!("Calendar updated ({} busy day(s))", busy.len());
        }
    }
    Ok(())
}

/// Confirmation via stdin unless `--yes` was given.
fn prompt(assume_yes: bool) -> impl Fn(&str) -> bool {
    move |question: &str| {
        if assume_yes {
            return true;
        }
        print!("{question} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

fn report(outcome: DeleteOutcome, done: &str) {
    match outcome {
        DeleteOutcome::Deleted => println!("{done}"),
        DeleteOutcome::Declined => println!("Cancelled"),
    }
}
