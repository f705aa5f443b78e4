use std::{io, str::SplitWhitespace, sync::OnceLock};

use application::{Args, Config, Context, View};
use common::{
    pagination::{Direction, Limit, Order},
    Date, DateTime,
};
use secrecy::SecretBox;
use service::domain::{patient, record, user};
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::WARN)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::WARN)
                                >= *meta.level()
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config { api, service, log } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let rest = service::infra::Rest::new(&api.into()).map_err(|e| {
        log::error!("failed to initialize `Rest` client: {e}");
    })?;
    let mut context =
        Context::new(application::Service::new(service.into(), rest));

    run(&mut context).await
}

async fn run(ctx: &mut Context) -> Result<(), ()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    ctx.sync().await;
    render(ctx);

    loop {
        let line = lines.next_line().await.map_err(|e| {
            log::error!("failed to read stdin: {e}");
        })?;
        let Some(line) = line else {
            return Ok(());
        };

        if !dispatch(ctx, line.trim()).await {
            return Ok(());
        }
        render(ctx);
    }
}

fn render(ctx: &mut Context) {
    for notice in ctx.take_notices() {
        println!("! {notice}");
    }
    for line in ctx.screen() {
        println!("{line}");
    }
}

async fn dispatch(ctx: &mut Context, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return true;
    };

    match cmd {
        "quit" | "exit" => return false,
        "help" => help(),
        "signin" => {
            if let (Some(login), Some(password)) =
                (arg::<user::Login>(&mut parts), arg(&mut parts))
            {
                let credentials = user::session::Credentials {
                    login,
                    password: SecretBox::new(Box::new(password)),
                };
                if ctx.sign_in(credentials).await {
                    ctx.sync().await;
                }
            } else {
                println!("usage: signin <login> <password>");
            }
        }
        "signout" => ctx.sign_out(),
        "open" => match parts.next().and_then(view_of) {
            Some(view) => ctx.open(view).await,
            None => println!(
                "usage: open \
                 <dashboard|patients|records|appointments|users>",
            ),
        },
        "next" => {
            if ctx.navigate(Direction::Forward) {
                ctx.sync().await;
            }
        }
        "prev" => {
            if ctx.navigate(Direction::Backward) {
                ctx.sync().await;
            }
        }
        "limit" => match arg(&mut parts).and_then(Limit::new) {
            Some(limit) => {
                ctx.set_limit(limit);
                ctx.sync().await;
            }
            None => println!("usage: limit <10|20|50|100>"),
        },
        "search" => {
            let term = parts.collect::<Vec<_>>().join(" ");
            ctx.set_search(&term);
            ctx.sync().await;
        }
        "sort" => match parts.next() {
            Some("-") | None => {
                ctx.clear_ordering();
                ctx.sync().await;
            }
            Some(field) => {
                let order = if parts.next() == Some("desc") {
                    Order::Descending
                } else {
                    Order::Ascending
                };
                if ctx.set_ordering(field, order) {
                    ctx.sync().await;
                } else {
                    println!("cannot sort by `{field}`");
                }
            }
        },
        "filter" => match parts.next() {
            Some(field) => {
                let value = parts.next().unwrap_or("");
                if ctx.set_filter(field, value) {
                    ctx.sync().await;
                } else {
                    println!("cannot filter by `{field}` here");
                }
            }
            None => println!("usage: filter <field> [value]"),
        },
        "select" => match parts.next() {
            Some(raw_id) if ctx.toggle(raw_id) => {}
            Some(_) | None => println!("usage: select <id>"),
        },
        "all" => ctx.toggle_all(),
        "clear" => ctx.clear_selection(),
        "edit" => match parts.next() {
            Some(raw_id) if ctx.begin_edit(raw_id) => {}
            Some(_) | None => println!("usage: edit <id>"),
        },
        "delete" => {
            ctx.delete_selected().await;
            ctx.sync().await;
        }
        "cancel" => {
            ctx.cancel_selected().await;
            ctx.sync().await;
        }
        "refetch" => {
            ctx.refetch();
            ctx.sync().await;
        }
        _ => {
            if !compose(ctx, cmd, parts).await {
                println!("unknown command, try `help`");
            }
        }
    }
    true
}

/// Dispatches the commands composing new entries, returning whether the
/// command was recognized.
async fn compose(
    ctx: &mut Context,
    cmd: &str,
    parts: SplitWhitespace<'_>,
) -> bool {
    match cmd {
        "add-patient" | "update-patient" => patient_cmd(ctx, cmd, parts).await,
        "add-record" => record_cmd(ctx, parts).await,
        "schedule" => schedule_cmd(ctx, parts).await,
        "add-user" => user_cmd(ctx, parts).await,
        "role" => role_cmd(ctx, parts).await,
        _ => return false,
    }
    true
}

async fn patient_cmd(
    ctx: &mut Context,
    cmd: &str,
    mut parts: SplitWhitespace<'_>,
) {
    let draft = (
        parts.next().and_then(|s| Date::from_iso8601(s).ok()),
        kind_arg(&mut parts),
        patient::Name::new(parts.collect::<Vec<_>>().join(" ")),
    );
    let (Some(birth_date), Some(gender), Some(name)) = draft else {
        println!("usage: {cmd} <YYYY-MM-DD> <male|female|other> <name>");
        return;
    };

    let draft = patient::Draft {
        name,
        birth_date,
        gender,
        phone: None,
        email: None,
    };
    let done = if cmd == "add-patient" {
        ctx.add_patient(draft).await
    } else {
        ctx.update_patient(draft).await
    };
    if done {
        ctx.sync().await;
    }
}

async fn record_cmd(ctx: &mut Context, mut parts: SplitWhitespace<'_>) {
    let draft = (
        arg(&mut parts),
        kind_arg(&mut parts),
        record::Title::new(parts.collect::<Vec<_>>().join(" ")),
    );
    let (Some(patient_id), Some(kind), Some(title)) = draft else {
        println!("usage: add-record <patient-id> <kind> <title>");
        return;
    };

    let draft = record::Draft {
        patient_id,
        kind,
        title,
        note: None,
        recorded_at: DateTime::now().coerce(),
    };
    if ctx.add_record(draft).await {
        ctx.sync().await;
    }
}

async fn schedule_cmd(ctx: &mut Context, mut parts: SplitWhitespace<'_>) {
    let draft = (
        arg(&mut parts),
        parts.next().and_then(|s| DateTime::from_rfc3339(s).ok()),
    );
    let (Some(patient_id), Some(scheduled_at)) = draft else {
        println!("usage: schedule <patient-id> <RFC 3339 datetime> [reason]");
        return;
    };

    let draft = service::domain::appointment::Draft {
        patient_id,
        scheduled_at: scheduled_at.coerce(),
        reason: service::domain::appointment::Reason::new(
            parts.collect::<Vec<_>>().join(" "),
        ),
    };
    if ctx.schedule(draft).await {
        ctx.sync().await;
    }
}

async fn user_cmd(ctx: &mut Context, mut parts: SplitWhitespace<'_>) {
    let draft = (
        arg::<user::Login>(&mut parts),
        arg::<user::Password>(&mut parts),
        kind_arg(&mut parts),
        user::Name::new(parts.collect::<Vec<_>>().join(" ")),
    );
    let (Some(login), Some(password), Some(role), Some(name)) = draft else {
        println!("usage: add-user <login> <password> <role> <name>");
        return;
    };

    let draft = user::Draft {
        name,
        login,
        password: SecretBox::new(Box::new(password)),
        role,
    };
    if ctx.add_user(draft).await {
        ctx.sync().await;
    }
}

async fn role_cmd(ctx: &mut Context, mut parts: SplitWhitespace<'_>) {
    let (Some(id), Some(role)) = (arg(&mut parts), kind_arg(&mut parts))
    else {
        println!("usage: role <user-id> <role>");
        return;
    };

    if ctx.change_role(id, role).await {
        ctx.sync().await;
    }
}

fn help() {
    println!(
        "commands:\n  \
         signin <login> <password> | signout\n  \
         open <dashboard|patients|records|appointments|users>\n  \
         next | prev | limit <n> | search [term] | sort <field|-> [desc]\n  \
         filter <field> [value]\n  \
         select <id> | all | clear | edit <id> | delete | cancel\n  \
         add-patient <YYYY-MM-DD> <gender> <name>\n  \
         update-patient <YYYY-MM-DD> <gender> <name>\n  \
         add-record <patient-id> <kind> <title>\n  \
         schedule <patient-id> <datetime> [reason]\n  \
         add-user <login> <password> <role> <name>\n  \
         role <user-id> <role>\n  \
         refetch | help | quit",
    );
}

fn arg<T: std::str::FromStr>(parts: &mut SplitWhitespace<'_>) -> Option<T> {
    parts.next().and_then(|s| s.parse().ok())
}

/// Parses a kind enum argument, accepting it case-insensitively.
fn kind_arg<T: std::str::FromStr>(
    parts: &mut SplitWhitespace<'_>,
) -> Option<T> {
    parts.next().and_then(|s| s.to_uppercase().parse().ok())
}

fn view_of(name: &str) -> Option<View> {
    Some(match name {
        "dashboard" => View::Dashboard,
        "patients" => View::Patients,
        "records" => View::Records,
        "appointments" => View::Appointments,
        "users" => View::Users,
        _ => return None,
    })
}
