use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

mod binding;
mod config;
mod engine;
mod error;
mod events;
pub mod mappings;
mod services;
mod utils;

use config::Config;
use services::{create_desktop, create_keyboard_listener, Dispatcher};

#[derive(Parser, Debug)]
#[command(name = "run-or-raise")]
#[command(about = "Шорткаты, которые фокусируют подходящее окно или запускают команду")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (важнее значения из конфигурации)
    #[arg(long)]
    log_level: Option<String>,

    /// Проверить файл шорткатов и выйти
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let config = Arc::new(Config::load(&config_path)?);

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск run-or-raise v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация: {:?}", config_path);

    let report = binding::load_bindings(config.bindings_path())?;
    for e in &report.errors {
        warn!("{}", e);
    }

    if args.check {
        for (line, binding) in &report.bindings {
            println!("{:>4}: {}", line, binding);
        }
        for e in &report.errors {
            eprintln!("{}", e);
        }
        if !report.errors.is_empty() {
            anyhow::bail!("Строк с ошибками: {}", report.errors.len());
        }
        return Ok(());
    }

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else {
        utils::permissions::check_permissions()?;
    }

    let desktop = create_desktop(&config, args.dry_run)?;
    let dispatcher = Dispatcher::new(report.bindings, &config.behavior.to_behavior(), desktop);
    if dispatcher.is_empty() {
        warn!("Нет ни одного назначенного шортката");
    }

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let keyboard_listener =
        create_keyboard_listener(config.clone(), events_tx, dispatcher.sequences(), args.dry_run)?;

    info!("Все компоненты инициализированы");

    let dispatcher_handle = tokio::task::spawn_blocking(move || dispatcher.run_blocking(events_rx));
    let mut keyboard_handle = tokio::spawn(async move {
        if let Err(e) = keyboard_listener.run().await {
            error!("Ошибка в KeyboardListener: {}", e);
        }
    });

    info!("Все сервисы запущены");

    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
            Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
        },
        _ = &mut keyboard_handle => warn!("KeyboardListener остановился"),
    }

    info!("Завершение работы...");
    keyboard_handle.abort();

    if dispatcher_handle.is_finished() {
        info!("Все сервисы завершили работу корректно");
    }

    info!("run-or-raise завершил работу");
    // Поток чтения evdev заблокирован в read(), рантайм не должен его ждать
    std::process::exit(0);
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "pretty" => registry.with(fmt::layer().pretty()).init(),
        _ => registry.with(fmt::layer().compact()).init(),
    }

    Ok(())
}
