//! Platform client seam and the responses the paginator sends through it.

use std::future::Future;

use twilight_http::Client;
use twilight_model::{
    channel::message::{MessageFlags, component::Component, embed::Embed},
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{Id, marker::ChannelMarker},
};
use twilight_util::builder::InteractionResponseDataBuilder;

use crate::interaction::{InteractionRef, MessageHandle};

/// The platform operations the paginator needs.
///
/// Implemented for [`twilight_http::Client`]; tests substitute a recorder.
pub trait InteractionClient: Send + Sync + 'static {
    /// Send a new message with embeds and components.
    fn create_message(
        &self,
        channel_id: Id<ChannelMarker>,
        embeds: &[Embed],
        components: &[Component],
    ) -> impl Future<Output = anyhow::Result<MessageHandle>> + Send;

    /// Acknowledge an interaction. Allowed exactly once per interaction.
    fn create_response(
        &self,
        interaction: &InteractionRef,
        response: &InteractionResponse,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Edit the original response of an already acknowledged interaction.
    fn update_response(
        &self,
        interaction: &InteractionRef,
        embeds: &[Embed],
        components: &[Component],
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Replace the components of a sent message.
    fn update_message(
        &self,
        message: MessageHandle,
        components: &[Component],
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl InteractionClient for Client {
    async fn create_message(
        &self,
        channel_id: Id<ChannelMarker>,
        embeds: &[Embed],
        components: &[Component],
    ) -> anyhow::Result<MessageHandle> {
        let message = Client::create_message(self, channel_id)
            .embeds(embeds)
            .components(components)
            .await?
            .model()
            .await?;

        Ok(MessageHandle {
            channel_id: message.channel_id,
            message_id: message.id,
        })
    }

    async fn create_response(
        &self,
        interaction: &InteractionRef,
        response: &InteractionResponse,
    ) -> anyhow::Result<()> {
        self.interaction(interaction.application_id)
            .create_response(interaction.id, &interaction.token, response)
            .await?;

        Ok(())
    }

    async fn update_response(
        &self,
        interaction: &InteractionRef,
        embeds: &[Embed],
        components: &[Component],
    ) -> anyhow::Result<()> {
        self.interaction(interaction.application_id)
            .update_response(&interaction.token)
            .embeds(Some(embeds))
            .components(Some(components))
            .await?;

        Ok(())
    }

    async fn update_message(
        &self,
        message: MessageHandle,
        components: &[Component],
    ) -> anyhow::Result<()> {
        Client::update_message(self, message.channel_id, message.message_id)
            .components(Some(components))
            .await?;

        Ok(())
    }
}

/// Initial response posting a new message with embeds and components.
pub fn channel_message_response(embeds: Vec<Embed>, components: Vec<Component>) -> InteractionResponse {
    InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .embeds(embeds)
                .components(components)
                .build(),
        ),
    }
}

/// In-place update of the message carrying the pressed component.
pub fn update_message_response(embeds: Vec<Embed>, components: Vec<Component>) -> InteractionResponse {
    InteractionResponse {
        kind: InteractionResponseType::UpdateMessage,
        data: Some(
            InteractionResponseDataBuilder::new()
                .embeds(embeds)
                .components(components)
                .build(),
        ),
    }
}

/// In-place update that strips every component and leaves the rest as is.
pub fn strip_components_response() -> InteractionResponse {
    InteractionResponse {
        kind: InteractionResponseType::UpdateMessage,
        data: Some(
            InteractionResponseDataBuilder::new()
                .components(Vec::new())
                .build(),
        ),
    }
}

/// Acknowledge a component press without changing the message.
pub fn deferred_update_response() -> InteractionResponse {
    InteractionResponse {
        kind: InteractionResponseType::DeferredUpdateMessage,
        data: None,
    }
}

/// Reply only the presser can see.
pub fn ephemeral_response(content: &str) -> InteractionResponse {
    InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(content)
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    }
}

/// Respond to an interaction with an ephemeral message.
pub async fn respond_ephemeral_message(
    client: &impl InteractionClient,
    interaction: &InteractionRef,
    content: &str,
) -> anyhow::Result<()> {
    client
        .create_response(interaction, &ephemeral_response(content))
        .await
}

/// Acknowledge a component press, deferring any visible change.
pub async fn defer_component_update(
    client: &impl InteractionClient,
    interaction: &InteractionRef,
) -> anyhow::Result<()> {
    client
        .create_response(interaction, &deferred_update_response())
        .await
}
