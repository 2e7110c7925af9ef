use twilight_model::gateway::{
    event::Event,
    payload::incoming::{InteractionCreate, MessageCreate, Ready},
};

use crate::dispatcher::EventKind;

impl EventKind<Event> for Box<MessageCreate> {
    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::MessageCreate(message) => Some(message.clone()),
            _ => None,
        }
    }
}

impl EventKind<Event> for Box<InteractionCreate> {
    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::InteractionCreate(interaction) => Some(interaction.clone()),
            _ => None,
        }
    }
}

impl EventKind<Event> for Box<Ready> {
    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Ready(ready) => Some(Box::new(ready.clone())),
            _ => None,
        }
    }
}
