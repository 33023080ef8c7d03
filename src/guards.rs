use lazy_static::lazy_static;
use log::warn;

lazy_static! {
    /// Static operator allow-list, comma-separated Telegram ids in OWNER_IDS.
    static ref OWNER_IDS: Vec<i64> = {
        match std::env::var("OWNER_IDS") {
            Ok(raw) => raw
                .split(',')
                .filter_map(|part| part.trim().parse::<i64>().ok())
                .collect(),
            Err(_) => {
                warn!("OWNER_IDS is not set, the bot will ignore everyone");
                Vec::new()
            }
        }
    };
}

pub fn is_owner(telegram_id: i64) -> bool {
    OWNER_IDS.contains(&telegram_id)
}
