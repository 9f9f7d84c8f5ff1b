//! Crafting notifications and the event bus that carries them.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use tinker_common::EntityId;

/// Sent to every freshly crafted product.
///
/// Carries the consumed input stacks so listeners can copy properties from
/// the inputs onto the product. The inputs are destroyed once every product
/// has been notified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnRecipeCrafted {
    /// Entities holding the removed inputs, in recipe input order
    pub ingredients: Vec<EntityId>,
}

impl OnRecipeCrafted {
    /// Creates the notification for a set of consumed inputs.
    #[must_use]
    pub fn new(ingredients: Vec<EntityId>) -> Self {
        Self { ingredients }
    }
}

/// Events published by the crafting module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftingEvent {
    /// A recipe was crafted
    RecipeCrafted {
        /// Entity that crafted
        crafter: EntityId,
        /// Output name of the recipe
        output: String,
        /// Products created
        products: Vec<EntityId>,
    },
    /// A product received its crafted notification
    ProductNotified {
        /// The product
        product: EntityId,
        /// Consumed inputs
        event: OnRecipeCrafted,
    },
    /// A craft was aborted after inputs were chosen
    CraftAborted {
        /// Entity that tried to craft
        crafter: EntityId,
        /// Output name of the recipe
        output: String,
    },
}

/// Event bus for broadcasting crafting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<CraftingEvent>,
    receiver: Receiver<CraftingEvent>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: CraftingEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<CraftingEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<CraftingEvent> {
        self.sender.clone()
    }
}
