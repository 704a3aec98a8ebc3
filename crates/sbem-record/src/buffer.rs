use crate::codec::encode;
use crate::cursor::{RecordCursor, Records};
use crate::error::Result;
use crate::firmware::FirmwareGeneration;

/// Owned, append-only sequence of encoded records.
///
/// Used both to build request payloads and to hold reassembled replies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBuffer {
    data: Vec<u8>,
}

impl RecordBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` encoded bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Adopt already-encoded bytes, e.g. a reply body. Not validated.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self { data: bytes.into() }
    }

    /// Append one `id:payload` record.
    pub fn add(&mut self, id: u8, payload: &[u8]) -> Result<()> {
        encode(&mut self.data, id, payload)
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Drop all records, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Start a read cursor over the records.
    pub fn cursor(&self, generation: FirmwareGeneration) -> RecordCursor<'_> {
        RecordCursor::new(&self.data, generation)
    }

    /// Iterate over the records.
    pub fn records(&self, generation: FirmwareGeneration) -> Records<'_> {
        Records::new(self.cursor(generation))
    }
}

impl AsRef<[u8]> for RecordBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for RecordBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::RecordError;

    #[test]
    fn starts_empty() {
        let buf = RecordBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert!(buf.records(FirmwareGeneration::Gen2).next().is_none());
    }

    #[test]
    fn add_appends_in_order() {
        let mut buf = RecordBuffer::with_capacity(16);
        buf.add(1, &[0xAA, 0xBB]).unwrap();
        buf.add(1, &[0xCC]).unwrap();

        assert_eq!(buf.as_bytes(), &[0x01, 0x02, 0xAA, 0xBB, 0x01, 0x01, 0xCC]);
    }

    #[test]
    fn concrete_request_layout() {
        let mut buf = RecordBuffer::new();
        buf.add(1, &[0xAA, 0xBB]).unwrap();
        buf.add(2, &[0x00; 300]).unwrap();

        let mut expected = vec![0x01, 0x02, 0xAA, 0xBB, 0x02, 0xFF, 0x2C, 0x01, 0x00, 0x00];
        expected.extend_from_slice(&[0x00; 300]);
        assert_eq!(buf.as_bytes(), expected.as_slice());

        let records: Vec<_> = buf
            .records(FirmwareGeneration::Gen1)
            .map(|r| r.map(|r| (r.id, r.length, r.payload.to_vec())))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            records,
            vec![(1, 2, vec![0xAA, 0xBB]), (2, 300, vec![0x00; 300])]
        );
    }

    #[test]
    fn clear_and_into_bytes() {
        let mut buf = RecordBuffer::new();
        buf.add(3, b"xyz").unwrap();
        let bytes = buf.clone().into_bytes();
        assert_eq!(bytes, vec![3, 3, b'x', b'y', b'z']);

        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(RecordBuffer::from(bytes.clone()), RecordBuffer::from_bytes(bytes));
    }

    #[test]
    fn adopted_reply_bytes_iterate() {
        let buf = RecordBuffer::from_bytes(vec![0x09, 0x01, 0x7F]);
        let mut cursor = buf.cursor(FirmwareGeneration::Gen3);
        cursor.advance().unwrap();
        assert_eq!(cursor.id(), 9);
        assert_eq!(cursor.payload().unwrap(), &[0x7F]);
        assert!(matches!(cursor.advance(), Err(RecordError::Exhausted)));
    }

    fn record_strategy() -> impl Strategy<Value = (u8, Vec<u8>)> {
        let id = any::<u8>().prop_filter("log entry ids", |id| *id != 0x7A && *id != 0x8A);
        (id, prop::collection::vec(any::<u8>(), 0..600))
    }

    proptest! {
        #[test]
        fn prop_records_read_back_in_order(
            records in prop::collection::vec(record_strategy(), 0..12),
            generation in prop::sample::select(FirmwareGeneration::ALL.to_vec()),
        ) {
            let mut buf = RecordBuffer::new();
            for (id, payload) in &records {
                buf.add(*id, payload).unwrap();
            }

            let mut cursor = buf.cursor(generation);
            cursor.reset();
            for (id, payload) in &records {
                prop_assert!(cursor.advance().is_ok());
                prop_assert_eq!(cursor.id(), *id);
                prop_assert_eq!(cursor.length() as usize, payload.len());
                prop_assert_eq!(cursor.payload().unwrap(), payload.as_slice());
            }
            prop_assert!(cursor.advance().unwrap_err().is_exhausted());
        }

        #[test]
        fn prop_any_id_reads_back_outside_gen2(
            records in prop::collection::vec((any::<u8>(), prop::collection::vec(any::<u8>(), 0..300)), 0..8),
        ) {
            let mut buf = RecordBuffer::new();
            for (id, payload) in &records {
                buf.add(*id, payload).unwrap();
            }

            let decoded: Vec<(u8, Vec<u8>)> = buf
                .records(FirmwareGeneration::Gen1)
                .map(|r| r.map(|r| (r.id, r.payload.to_vec())))
                .collect::<Result<_>>()
                .unwrap();
            prop_assert_eq!(decoded, records);
        }
    }
}
