//! Minimal views over twilight interactions used by the paginator.

use rusty_events::EventKind;
use twilight_model::{
    application::interaction::{Interaction, InteractionData},
    channel::message::component::ComponentType,
    gateway::event::Event,
    id::{
        Id,
        marker::{ApplicationMarker, ChannelMarker, InteractionMarker, MessageMarker, UserMarker},
    },
};

/// Everything needed to answer an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRef {
    pub application_id: Id<ApplicationMarker>,
    pub id: Id<InteractionMarker>,
    pub token: String,
}

impl InteractionRef {
    pub fn from_interaction(interaction: &Interaction) -> Self {
        Self {
            application_id: interaction.application_id,
            id: interaction.id,
            token: interaction.token.clone(),
        }
    }
}

/// Location of a sent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub channel_id: Id<ChannelMarker>,
    pub message_id: Id<MessageMarker>,
}

/// A button press on a message component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPress {
    pub interaction: InteractionRef,
    pub custom_id: String,
    /// Acting user, when the platform reported one.
    pub user_id: Option<Id<UserMarker>>,
    /// Message carrying the pressed button.
    pub message: Option<MessageHandle>,
}

impl ComponentPress {
    /// Extract a button press; any other interaction yields `None`.
    pub fn from_interaction(interaction: &Interaction) -> Option<Self> {
        let Some(InteractionData::MessageComponent(data)) = interaction.data.as_ref() else {
            return None;
        };

        if data.component_type != ComponentType::Button {
            return None;
        }

        Some(Self {
            interaction: InteractionRef::from_interaction(interaction),
            custom_id: data.custom_id.clone(),
            user_id: interaction.author_id(),
            message: interaction.message.as_ref().map(|message| MessageHandle {
                channel_id: message.channel_id,
                message_id: message.id,
            }),
        })
    }
}

impl EventKind<Event> for ComponentPress {
    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::InteractionCreate(interaction) => ComponentPress::from_interaction(&interaction.0),
            _ => None,
        }
    }
}
