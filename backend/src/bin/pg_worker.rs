//! Embedded PostgreSQL lifecycle helper for root-run integration tests.
//!
//! `pg_embedded_setup_unpriv` refuses to run PostgreSQL as root, so it drops
//! privileges by invoking this binary as `pg_worker <setup|start|stop>
//! <payload.json>`. The payload is a
//! [`pg_embedded_setup_unpriv::worker::WorkerPayload`] carrying the cluster
//! settings and the environment the operation must see.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Report, Result, eyre};
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
use postgresql_embedded::PostgreSQL;
use tokio::runtime::Builder;

fn main() -> Result<()> {
    color_eyre::install()?;
    let invocation = Invocation::parse(env::args_os())?;
    let payload = load_payload(&invocation.payload_path)?;
    execute(invocation.operation, payload)
}

/// Parsed command line of a worker call.
#[derive(Debug)]
struct Invocation {
    operation: Operation,
    payload_path: PathBuf,
}

impl Invocation {
    fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Self> {
        let _program = args.next();
        let operation = args
            .next()
            .ok_or_else(|| eyre!("missing operation argument"))
            .and_then(|raw| Operation::parse(&raw))?;
        let payload_path = args
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| eyre!("missing payload path argument"))?;
        if let Some(extra) = args.next() {
            return Err(eyre!(
                "unexpected extra argument: {}; expected only operation and payload path",
                extra.to_string_lossy()
            ));
        }
        Ok(Self {
            operation,
            payload_path,
        })
    }
}

fn load_payload(path: &Path) -> Result<WorkerPayload> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read worker payload at {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse worker payload at {}", path.display()))
}

fn execute(operation: Operation, payload: WorkerPayload) -> Result<()> {
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| Report::new(err).wrap_err("failed to rebuild postgres settings"))?;
    apply_environment(payload.environment);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build worker runtime")?;

    let mut postgres = PostgreSQL::new(settings);
    runtime
        .block_on(async move {
            match operation {
                Operation::Setup => postgres.setup().await,
                Operation::Start => postgres.start().await,
                Operation::Stop => postgres.stop().await,
            }
        })
        .with_context(|| format!("postgresql_embedded {operation} failed"))
}

fn apply_environment(environment: Vec<(String, Option<PlainSecret>)>) {
    for (key, value) in environment {
        // SAFETY: runs before the runtime or any other thread is started.
        match value {
            Some(value) => unsafe { env::set_var(&key, value.expose()) },
            None => unsafe { env::remove_var(&key) },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operation {
    Setup,
    Start,
    Stop,
}

impl Operation {
    fn parse(raw: &OsStr) -> Result<Self> {
        match raw.to_string_lossy().as_ref() {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(eyre!(
                "unknown pg_worker operation '{other}'; expected setup, start or stop"
            )),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        })
    }
}
