use crate::bot;
use crate::bot::handlers::{get_user_id_safe, Command};
use crate::bot::TelegramMembership;
use crate::config::BotSettings;
use crate::health;
use anime_search_core::dataset::Dataset;
use anime_search_core::membership::MembershipGate;
use anime_search_core::search::AnimeSearch;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info};

/// Run the Telegram transport runtime.
///
/// Starts the liveness endpoint in the background, then dispatches updates
/// until Ctrl-C.
pub async fn run_bot(settings: Arc<BotSettings>, dataset: Arc<Dataset>) {
    let bot = Bot::new(settings.telegram.telegram_bot_token.clone());
    let search = init_search(&bot, &settings, dataset);

    spawn_health_server(settings.telegram.port);
    register_commands(&bot).await;

    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![search, settings])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn init_search(bot: &Bot, settings: &BotSettings, dataset: Arc<Dataset>) -> Arc<AnimeSearch> {
    let channel_id = settings.telegram.channel_id.clone();
    info!(
        "Gating access on channel {} ({} anime records).",
        channel_id,
        dataset.len()
    );

    let gate = MembershipGate::new(Arc::new(TelegramMembership::new(bot.clone())), channel_id);
    Arc::new(AnimeSearch::new(dataset, gate))
}

fn spawn_health_server(port: u16) {
    tokio::spawn(async move {
        if let Err(e) = health::serve(port).await {
            error!("Liveness server on port {port} stopped: {e}");
        }
    });
}

async fn register_commands(bot: &Bot) {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        error!("Failed to register bot commands: {e}");
    }
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_text))
        .branch(dptree::endpoint(handle_non_text))
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    search: Arc<AnimeSearch>,
    settings: Arc<BotSettings>,
) -> Result<(), teloxide::RequestError> {
    let user_id = get_user_id_safe(&msg);
    let res = match cmd {
        Command::Start(_) => bot::handlers::start(bot, msg).await,
        Command::List => bot::handlers::list(bot, msg, search, settings).await,
    };
    if let Err(e) = res {
        error!("Command error for user {user_id}: {e}");
    }
    respond(())
}

async fn handle_text(
    bot: Bot,
    msg: Message,
    search: Arc<AnimeSearch>,
    settings: Arc<BotSettings>,
) -> Result<(), teloxide::RequestError> {
    let user_id = get_user_id_safe(&msg);
    if let Err(e) = bot::handlers::handle_text(bot, msg, search, settings).await {
        error!("Text handler error for user {user_id}: {e}");
    }
    respond(())
}

async fn handle_non_text(msg: Message) -> Result<(), teloxide::RequestError> {
    debug!(
        "Ignoring non-text message from user {}",
        get_user_id_safe(&msg)
    );
    respond(())
}
