use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::entities::cash_movement::CashMovementKind;
use crate::entities::sale::PaymentMethod;
use crate::entities::stock_movement::MovementType;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the consumer is gone.
    /// Services call this after commit, where an event loss must not turn a
    /// completed operation into an error.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            error!("Event dropped: {}", e);
        }
    }
}

// Events emitted by the services after their transaction commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Sales
    SaleCompleted {
        sale_id: Uuid,
        total: Decimal,
        payment_method: PaymentMethod,
        item_count: usize,
    },

    // Purchasing
    PurchaseCreated(Uuid),
    PurchaseReceived {
        purchase_id: Uuid,
        item_count: usize,
    },
    PurchaseCancelled(Uuid),

    // Inventory
    StockAdjusted {
        product_id: Uuid,
        movement_type: MovementType,
        quantity: i32,
        old_stock: i32,
        new_stock: i32,
    },
    LowStock {
        product_id: Uuid,
        stock: i32,
        min_stock: i32,
    },

    // Cash register
    RegisterOpened {
        register_id: Uuid,
        opened_by: Uuid,
    },
    RegisterClosed {
        register_id: Uuid,
        difference: Decimal,
    },
    CashMovementRecorded {
        register_id: Uuid,
        kind: CashMovementKind,
        amount: Decimal,
    },

    // Admin
    UserCreated(Uuid),
}

/// Consumes events off the channel and turns them into log output. Runs for
/// the lifetime of the process; exits when every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::SaleCompleted {
                sale_id,
                total,
                payment_method,
                item_count,
            } => {
                info!(
                    %sale_id,
                    %total,
                    ?payment_method,
                    item_count,
                    "Sale completed"
                );
            }
            Event::LowStock {
                product_id,
                stock,
                min_stock,
            } => {
                warn!(
                    %product_id,
                    stock,
                    min_stock,
                    "Product at or below minimum stock"
                );
            }
            Event::RegisterClosed {
                register_id,
                difference,
            } => {
                if difference.is_zero() {
                    info!(%register_id, "Register closed, drawer balanced");
                } else {
                    warn!(
                        %register_id,
                        %difference,
                        "Register closed with a cash difference"
                    );
                }
            }
            Event::PurchaseReceived {
                purchase_id,
                item_count,
            } => {
                info!(%purchase_id, item_count, "Purchase order received into stock");
            }
            other => {
                debug!(event = ?other, "Event processed");
            }
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn send_delivers_to_consumer() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::PurchaseCreated(Uuid::new_v4()))
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(Event::PurchaseCreated(_))
        ));
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let result = sender
            .send(Event::RegisterClosed {
                register_id: Uuid::new_v4(),
                difference: dec!(0),
            })
            .await;

        assert!(result.is_err());
    }
}
