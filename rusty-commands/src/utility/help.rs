use twilight_model::gateway::payload::incoming::MessageCreate;
use twilight_util::builder::embed::EmbedBuilder;

use crate::{COMMANDS, CommandMeta};
use rusty_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    usage: "!help",
};

/// Render the command catalog as one embed.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let embed = EmbedBuilder::new()
        .title("Commands")
        .color(ctx.paginators.config().embed_color())
        .description(help_description(COMMANDS))
        .validate()?
        .build();

    ctx.http
        .create_message(msg.channel_id)
        .embeds(&[embed])
        .await?;

    Ok(())
}

/// One line per command, sorted by name.
fn help_description(commands: &[CommandMeta]) -> String {
    let mut sorted: Vec<&CommandMeta> = commands.iter().collect();
    sorted.sort_unstable_by_key(|meta| meta.name);

    sorted
        .into_iter()
        .map(|meta| format!("`{}` - {}", meta.usage, meta.desc))
        .collect::<Vec<_>>()
        .join("\n")
}
