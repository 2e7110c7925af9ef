pub mod utility;

use twilight_model::gateway::payload::incoming::MessageCreate;

use rusty_core::{COMMAND_PREFIX, Context};

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    utility::pages::META,
    utility::browse::META,
    utility::clickme::META,
    utility::collect::META,
    // Add new commands here
];

/// Split a message into a lowercase command name and its first argument.
///
/// Returns `None` for messages without the command prefix.
pub fn parse_command(content: &str) -> Option<(String, Option<&str>)> {
    let content = content.trim().strip_prefix(COMMAND_PREFIX)?.trim();

    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let cmd = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    let arg1 = command_and_rest
        .next()
        .and_then(|rest| rest.split_whitespace().next());

    Some((cmd, arg1))
}

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let content = msg.content.clone();
    let Some((cmd, arg1)) = parse_command(&content) else {
        return Ok(());
    };

    match cmd.as_str() {
        "help" => utility::help::run(ctx, msg).await?,
        "pages" => utility::pages::run(ctx, msg, arg1).await?,
        "browse" => utility::browse::run(ctx, msg).await?,
        "clickme" => utility::clickme::run(ctx, msg).await?,
        "collect" => utility::collect::run(ctx, msg).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_need_the_prefix() {
        assert_eq!(parse_command("pages 2"), None);
        assert_eq!(parse_command("  !pages 2 "), Some(("pages".to_owned(), Some("2"))));
    }

    #[test]
    fn command_names_are_case_insensitive() {
        assert_eq!(parse_command("!ClickMe"), Some(("clickme".to_owned(), None)));
    }

    #[test]
    fn only_the_first_argument_is_kept() {
        assert_eq!(
            parse_command("!pages   3 extra words"),
            Some(("pages".to_owned(), Some("3")))
        );
    }

    #[test]
    fn every_command_is_listed_once() {
        let mut names: Vec<&str> = COMMANDS.iter().map(|meta| meta.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names, vec!["browse", "clickme", "collect", "help", "pages"]);
    }
}
