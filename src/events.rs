use crate::catalog::NewMovie;
use crate::clients::BuyOutcome;
use crate::error::ClientError;
use crate::models::{Metadata, MovieRecord};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Results sent from background tasks to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    /// Catalog fetch finished (successfully or not)
    CatalogFetched {
        seq: u64,
        result: Result<Vec<MovieRecord>, ClientError>,
    },

    /// Metadata for one visible movie arrived. Ids can repeat, so the
    /// looked-up title travels along.
    Enriched {
        seq: u64,
        id: u64,
        title: String,
        metadata: Metadata,
    },

    /// An add-form submission has been looked up and can be inserted
    MovieReady { movie: NewMovie, metadata: Metadata },

    /// Title suggestion for the search input
    Prediction { seq: u64, suggestion: Option<String> },

    /// Buy request finished
    BuyFinished {
        id: u64,
        result: Result<BuyOutcome, ClientError>,
    },

    /// Frame clock tick for the grid built under `generation`
    FrameTick { generation: u64 },
}

pub type EventSender = UnboundedSender<AppEvent>;
pub type EventReceiver = UnboundedReceiver<AppEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_delivers_in_order() {
        let (tx, mut rx) = channel();
        tx.send(AppEvent::FrameTick { generation: 1 }).unwrap();
        tx.send(AppEvent::Prediction {
            seq: 2,
            suggestion: Some("Jawan".into()),
        })
        .unwrap();

        assert!(matches!(rx.try_recv(), Ok(AppEvent::FrameTick { generation: 1 })));
        assert!(matches!(
            rx.try_recv(),
            Ok(AppEvent::Prediction { seq: 2, suggestion: Some(ref s) }) if s == "Jawan"
        ));
        assert!(rx.try_recv().is_err());
    }
}
