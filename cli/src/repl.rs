//! Read-eval-print loop driving the verification flow
//!
//! Input lines arrive on a channel so the loop never blocks on the terminal.
//! At most one flow operation is outstanding; lines entered meanwhile are
//! queued and interpreted against the stage that is current once the
//! operation finishes. `status` and `help` are answered immediately.

use std::collections::VecDeque;
use std::future::Future;
use std::io::{BufRead, Write};
use std::pin::Pin;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use cl_core::{FlowResult, FlowTask, LookupClient, Operation, VerificationFlow};

use crate::commands::{parse_command, Command};
use crate::presenter;

/// Capacity of the input line channel
const INPUT_BUFFER: usize = 64;

type PendingOperation = Pin<Box<dyn Future<Output = (Operation, FlowResult<String>)> + Send>>;

/// What the loop should do after a line was handled
enum Step {
    Continue,
    Start(PendingOperation),
    Quit,
}

/// Forward stdin lines to a channel from a dedicated thread
///
/// The thread ends at end of input or when the receiver is dropped.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read from stdin");
                    break;
                }
            }
        }
    });

    rx
}

/// Run the interactive loop until `quit` or end of input
///
/// `initial_phone` is handled as if it had been typed with the `phone`
/// command. An outstanding operation is always awaited before returning.
pub async fn run<C>(
    flow: VerificationFlow<C>,
    mut input: mpsc::Receiver<String>,
    initial_phone: Option<String>,
) -> anyhow::Result<()>
where
    C: LookupClient + ?Sized + 'static,
{
    let watcher = presenter::spawn_stage_watcher(flow.subscribe());
    let mut queue: VecDeque<String> = VecDeque::new();
    let mut pending: Option<PendingOperation> = None;
    let mut input_closed = false;

    info!(provider = flow.provider_name(), "Starting interactive session");
    println!("Lookup provider: {}", flow.provider_name());
    println!("{}", presenter::stage_banner(flow.stage()));

    if let Some(phone) = initial_phone {
        queue.push_back(format!("phone {}", phone));
    }

    'session: loop {
        while pending.is_none() {
            let Some(line) = queue.pop_front() else {
                break;
            };
            match handle_line(&flow, &line).await {
                Step::Continue => {}
                Step::Start(operation) => pending = Some(operation),
                Step::Quit => break 'session,
            }
        }

        if pending.is_none() {
            if input_closed {
                break;
            }
            show_prompt(&flow);
        }

        tokio::select! {
            (operation, outcome) = poll_pending(&mut pending), if pending.is_some() => {
                pending = None;
                debug!(operation = %operation, ok = outcome.is_ok(), "Operation finished");
                match outcome {
                    Ok(rendered) => println!("{}", rendered),
                    Err(e) => println!("{}", presenter::render_error(&e)),
                }
                // Let the stage watcher print before the next prompt
                tokio::task::yield_now().await;
            }
            line = input.recv(), if !input_closed => {
                match line {
                    None => {
                        debug!("End of input");
                        input_closed = true;
                    }
                    Some(line) if pending.is_some() => handle_busy_line(&flow, line, &mut queue),
                    Some(line) => queue.push_back(line),
                }
            }
            else => break,
        }
    }

    watcher.abort();
    info!("Interactive session ended");
    Ok(())
}

/// Handle a line while an operation is outstanding
fn handle_busy_line<C>(flow: &VerificationFlow<C>, line: String, queue: &mut VecDeque<String>)
where
    C: LookupClient + ?Sized,
{
    match parse_command(&line, flow.stage()) {
        Ok(Command::Status) => println!(
            "{}",
            presenter::render_status(flow.stage(), flow.try_snapshot().as_ref(), true)
        ),
        Ok(Command::Help) => println!("{}", presenter::HELP),
        _ => {
            println!("A request is already in progress; the input will run when it finishes.");
            queue.push_back(line);
        }
    }
}

/// Handle a line while no operation is outstanding
async fn handle_line<C>(flow: &VerificationFlow<C>, line: &str) -> Step
where
    C: LookupClient + ?Sized + 'static,
{
    let command = match parse_command(line, flow.stage()) {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return Step::Continue;
        }
    };

    match command {
        Command::Quit => Step::Quit,
        Command::Help => {
            println!("{}", presenter::HELP);
            Step::Continue
        }
        Command::Status => {
            let session = flow.snapshot().await;
            println!(
                "{}",
                presenter::render_status(flow.stage(), Some(&session), false)
            );
            Step::Continue
        }
        Command::Reset => {
            flow.reset().await;
            println!("Session discarded.");
            Step::Continue
        }
        Command::RequestOtp(phone) => start(flow.spawn_request_otp(phone)),
        Command::VerifyOtp(otp) => start(flow.spawn_verify_otp(otp)),
        Command::Search { number, country } => start(flow.spawn_search(number, country)),
        Command::BulkSearch { numbers, country } => {
            start(flow.spawn_bulk_search(numbers, country))
        }
    }
}

fn start<T>(task: FlowTask<T>) -> Step
where
    T: Serialize + Send + 'static,
{
    let operation = task.operation();
    println!("{}", presenter::progress_message(operation));

    Step::Start(Box::pin(async move {
        let outcome = task.await.map(|response| presenter::render_response(&response));
        (operation, outcome)
    }))
}

async fn poll_pending(pending: &mut Option<PendingOperation>) -> (Operation, FlowResult<String>) {
    match pending.as_mut() {
        Some(operation) => operation.await,
        None => std::future::pending().await,
    }
}

fn show_prompt<C>(flow: &VerificationFlow<C>)
where
    C: LookupClient + ?Sized,
{
    print!("{}", presenter::prompt(flow.stage()));
    let _ = std::io::stdout().flush();
}
