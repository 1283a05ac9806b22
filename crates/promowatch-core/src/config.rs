use std::{collections::HashMap, env, fs, path::Path};

use crate::{
    domain::{ChatId, UserId},
    errors::Error,
    Result,
};

/// Typed runtime configuration.
///
/// Rebuilt wholesale on every reload; the previous value is discarded, never
/// merged into.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub api_id: i64,
    pub api_hash: String,
    pub bot_token: String,
    pub operator_id: UserId,
    pub promo_chats: Vec<ChatId>,
    pub is_bot: bool,
}

impl RuntimeConfig {
    /// Read `path` in full and build a fresh config.
    ///
    /// Real environment variables take precedence over file entries, so a
    /// deployment can override the file without editing it. The file itself
    /// is re-read on every call: that is what lets the periodic reload pick
    /// up edits made while the process is running.
    pub fn load(path: &Path) -> Result<Self> {
        let vars = read_env_file(path);

        let api_id = parse_i64(&required(&vars, "API_ID")?, "API_ID")?;
        let api_hash = required(&vars, "API_HASH")?;
        let bot_token = required(&vars, "BOT_TOKEN")?;
        let operator_id = UserId(parse_i64(&required(&vars, "USER_ID")?, "USER_ID")?);

        let promo_chats =
            parse_chat_list(lookup(&vars, "PROMO_CHATS").as_deref().unwrap_or(""))?;
        let is_bot = lookup(&vars, "IS_BOT").map(|s| truthy(&s)).unwrap_or(false);

        Ok(Self {
            api_id,
            api_hash,
            bot_token,
            operator_id,
            promo_chats,
            is_bot,
        })
    }
}

/// Parse a dotenv-style file into a map.
///
/// Lines are `KEY=value`; blank lines and `#` comments are skipped, optional
/// surrounding quotes are stripped. A missing file yields an empty map, since
/// required keys may still come from the real environment.
fn read_env_file(path: &Path) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    let Ok(contents) = fs::read_to_string(path) else {
        return vars;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        vars.insert(key.to_string(), val);
    }

    vars
}

fn lookup(vars: &HashMap<String, String>, key: &str) -> Option<String> {
    env::var(key).ok().or_else(|| vars.get(key).cloned())
}

fn required(vars: &HashMap<String, String>, key: &str) -> Result<String> {
    match lookup(vars, key) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::Config(format!("{key} is required"))),
    }
}

fn parse_i64(raw: &str, key: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::Config(format!("{key} must be an integer, got '{raw}'")))
}

/// Split a comma-separated chat id list.
///
/// Entries are trimmed and empty tokens discarded; a malformed token aborts
/// the whole reload rather than silently shrinking the monitored set.
fn parse_chat_list(raw: &str) -> Result<Vec<ChatId>> {
    let mut chats = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let id = token.parse::<i64>().map_err(|_| {
            Error::Config(format!("PROMO_CHATS entry '{token}' is not an integer"))
        })?;
        chats.push(ChatId(id));
    }
    Ok(chats)
}

fn truthy(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const BASE: &str = "API_ID=12345\nAPI_HASH=abcdef\nBOT_TOKEN=123:token\nUSER_ID=777\n";

    fn tmp_env(name: &str, contents: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let path = PathBuf::from(format!(
            "/tmp/promowatch-env-{name}-{}-{ts}.env",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_required_fields_with_defaults() {
        let path = tmp_env("base", BASE);
        let cfg = RuntimeConfig::load(&path).unwrap();
        assert_eq!(cfg.api_id, 12345);
        assert_eq!(cfg.api_hash, "abcdef");
        assert_eq!(cfg.bot_token, "123:token");
        assert_eq!(cfg.operator_id, UserId(777));
        assert!(cfg.promo_chats.is_empty());
        assert!(!cfg.is_bot);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn parses_promo_chats_trimming_empty_tokens() {
        let path = tmp_env(
            "chats",
            &format!("{BASE}PROMO_CHATS=-100123, 200 ,,300\n"),
        );
        let cfg = RuntimeConfig::load(&path).unwrap();
        assert_eq!(
            cfg.promo_chats,
            vec![ChatId(-100123), ChatId(200), ChatId(300)]
        );
        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_promo_chat_aborts_the_load() {
        let path = tmp_env("badchats", &format!("{BASE}PROMO_CHATS=100,abc\n"));
        assert!(matches!(
            RuntimeConfig::load(&path),
            Err(Error::Config(_))
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_required_field_fails() {
        let path = tmp_env("nouser", "API_ID=1\nAPI_HASH=h\nBOT_TOKEN=t\n");
        assert!(matches!(
            RuntimeConfig::load(&path),
            Err(Error::Config(_))
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn non_numeric_api_id_fails() {
        let path = tmp_env(
            "badid",
            "API_ID=twelve\nAPI_HASH=h\nBOT_TOKEN=t\nUSER_ID=777\n",
        );
        assert!(matches!(
            RuntimeConfig::load(&path),
            Err(Error::Config(_))
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn strips_quotes_and_skips_comments() {
        let path = tmp_env(
            "quotes",
            "# identity\nAPI_ID=1\nAPI_HASH=\"secret hash\"\nBOT_TOKEN='123:tok'\nUSER_ID=777\n",
        );
        let cfg = RuntimeConfig::load(&path).unwrap();
        assert_eq!(cfg.api_hash, "secret hash");
        assert_eq!(cfg.bot_token, "123:tok");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn is_bot_accepts_truthy_spellings() {
        for (raw, expected) in [("yes", true), ("TRUE", true), ("1", true), ("0", false)] {
            let path = tmp_env("isbot", &format!("{BASE}IS_BOT={raw}\n"));
            let cfg = RuntimeConfig::load(&path).unwrap();
            assert_eq!(cfg.is_bot, expected, "IS_BOT={raw}");
            let _ = fs::remove_file(path);
        }
    }

    #[test]
    fn reload_picks_up_file_edits() {
        let path = tmp_env("edit", BASE);
        let first = RuntimeConfig::load(&path).unwrap();
        assert!(first.promo_chats.is_empty());

        fs::write(&path, format!("{BASE}PROMO_CHATS=100,200\n")).unwrap();
        let second = RuntimeConfig::load(&path).unwrap();
        assert_eq!(second.promo_chats, vec![ChatId(100), ChatId(200)]);
        let _ = fs::remove_file(path);
    }
}
