use crate::types::Item;

/// The attributes a stream record carries for a given table's view type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    KeysOnly,
    NewImage,
    OldImage,
    NewAndOldImages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    Insert,
    Modify,
    Remove,
}

/// A single change record. `old_image`/`new_image` are populated according to
/// the table's `ViewType` at append time — a `KeysOnly` stream carries neither
/// image, only whatever key attributes the caller already has.
#[derive(Debug, Clone)]
pub struct StreamRecord {
    pub table: String,
    pub event: StreamEvent,
    pub old_image: Option<Item>,
    pub new_image: Option<Item>,
    pub sequence: u64,
}

/// Append-only log of change records for one table. Writers append under the
/// same lock that guards the table's data, so sequence numbers are gapless
/// and ordered the way they were applied.
#[derive(Debug, Default)]
pub struct StreamLog {
    records: Vec<StreamRecord>,
}

impl StreamLog {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn append(
        &mut self,
        table: &str,
        event: StreamEvent,
        view_type: ViewType,
        old: Option<Item>,
        new: Option<Item>,
    ) {
        let (old_image, new_image) = match view_type {
            ViewType::KeysOnly => (None, None),
            ViewType::NewImage => (None, new),
            ViewType::OldImage => (old, None),
            ViewType::NewAndOldImages => (old, new),
        };
        let sequence = self.records.len() as u64;
        self.records.push(StreamRecord {
            table: table.to_string(),
            event,
            old_image,
            new_image,
            sequence,
        });
    }

    pub fn records(&self) -> &[StreamRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> Item {
        Item::new().with_s("id", id)
    }

    mod view_types {
        use super::*;

        #[test]
        fn new_and_old_images_keeps_both() {
            let mut log = StreamLog::new();
            log.append(
                "pokemons",
                StreamEvent::Modify,
                ViewType::NewAndOldImages,
                Some(item("001")),
                Some(item("002")),
            );
            let record = &log.records()[0];
            assert!(record.old_image.is_some());
            assert!(record.new_image.is_some());
        }

        #[test]
        fn keys_only_drops_both_images() {
            let mut log = StreamLog::new();
            log.append(
                "pokemons",
                StreamEvent::Insert,
                ViewType::KeysOnly,
                None,
                Some(item("001")),
            );
            let record = &log.records()[0];
            assert!(record.old_image.is_none());
            assert!(record.new_image.is_none());
        }

        #[test]
        fn new_image_drops_old_only() {
            let mut log = StreamLog::new();
            log.append(
                "pokemons",
                StreamEvent::Modify,
                ViewType::NewImage,
                Some(item("001")),
                Some(item("002")),
            );
            let record = &log.records()[0];
            assert!(record.old_image.is_none());
            assert!(record.new_image.is_some());
        }
    }

    #[test]
    fn sequence_numbers_are_gapless_and_ordered() {
        let mut log = StreamLog::new();
        for i in 0..3 {
            log.append(
                "pokemons",
                StreamEvent::Insert,
                ViewType::NewImage,
                None,
                Some(item(&i.to_string())),
            );
        }
        let sequences: Vec<u64> = log.records().iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(log.len(), 3);
    }
}
