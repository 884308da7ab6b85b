use crypto_dashboard::{
    ClearOutcome, Currency, Dashboard, DashboardError, Renderer, TerminalRenderer,
};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast::error::RecvError;

const HELP: &str = "\
Commands:
  search <term>     filter by name or symbol (empty term shows all)
  next | prev       change page
  currency <code>   switch currency (usd, eur, gbp, jpy, aud, cad, inr, btc, eth)
  add <coin id>     add to / remove from the watchlist
  remove <coin id>  remove from the watchlist
  clear             clear the watchlist
  refresh           fetch fresh data now
  health            show fetch health
  help              show this help
  quit              exit";

enum Flow {
    Continue,
    Quit,
}

type Input = Lines<BufReader<Stdin>>;

async fn handle_command(
    dashboard: &Dashboard,
    input: &mut Input,
    line: &str,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "search" | "s" => dashboard.search(arg).await,
        "next" | "n" => {
            dashboard.change_page(1).await;
        }
        "prev" | "p" => {
            dashboard.change_page(-1).await;
        }
        "currency" | "c" => match arg.parse::<Currency>() {
            // Fetch failures are already shown as notifications
            Ok(currency) => {
                let _ = dashboard.change_currency(currency).await;
            }
            Err(e) => eprintln!("{}", e),
        },
        "add" | "toggle" => match dashboard.toggle_watchlist(arg).await {
            Ok(_) => {}
            Err(DashboardError::UnknownCoin(id)) => {
                eprintln!("No coin with id {:?} in the current list", id)
            }
            Err(e) => eprintln!("{}", e),
        },
        "remove" | "rm" => {
            dashboard.remove_from_watchlist(arg).await;
        }
        "clear" => {
            let mut answer = false;
            if dashboard.watchlist_len().await > 0 {
                println!("{} [y/N]", crypto_dashboard::constants::CLEAR_WATCHLIST_PROMPT);
                if let Some(reply) = input.next_line().await? {
                    answer = matches!(reply.trim().to_lowercase().as_str(), "y" | "yes");
                }
            }
            if dashboard.clear_watchlist(&answer).await == ClearOutcome::AlreadyEmpty {
                println!("Watchlist is already empty");
            }
        }
        "refresh" | "r" => dashboard.refresh_all().await,
        "health" => {
            let health = dashboard.health_check().await;
            println!(
                "{:?}: {}",
                health.status,
                health.message.unwrap_or_default()
            );
            for metrics in dashboard.fetch_metrics().await {
                println!(
                    "  {}: p50={:.0}ms p99={:.0}ms success={:.1}% discarded={}",
                    metrics.endpoint,
                    metrics.latency_p50_ms,
                    metrics.latency_p99_ms,
                    metrics.success_rate * 100.0,
                    metrics.discarded_responses
                );
            }
        }
        "help" | "?" => println!("{}", HELP),
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        other => eprintln!("Unknown command {:?}; type `help`", other),
    }

    Ok(Flow::Continue)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let level = std::env::var("DASHBOARD_LOG")
        .ok()
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    SimpleLogger::new().with_level(level).init()?;

    let dashboard = Dashboard::from_env()?;
    let mut renderer = TerminalRenderer::new(std::io::stdout());
    let mut events = dashboard.subscribe();

    println!("{}", HELP);
    dashboard.load().await;
    renderer.render(&dashboard.view().await)?;

    let refresh = dashboard.start_auto_refresh();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else { break };
                if let Flow::Quit = handle_command(&dashboard, &mut input, line.trim()).await? {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(event) => {
                    tracing::trace!(
                        event_id = %event.id(),
                        event_type = event.event_type(),
                        event = %event,
                        "Redrawing"
                    );
                    println!();
                    renderer.render(&dashboard.view().await)?;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Render loop lagged behind events");
                    renderer.render(&dashboard.view().await)?;
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    refresh.abort();
    tracing::info!("Crypto dashboard stopped");
    Ok(())
}
