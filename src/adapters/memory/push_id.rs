//! Push ID generation
//!
//! Keys for appended children are 20 characters long: 8 characters encoding
//! the millisecond timestamp followed by 12 random characters. The alphabet is
//! in ASCII order, so keys sort chronologically as plain strings. Keys created
//! within the same millisecond increment the random part of the previous key
//! instead of drawing a fresh one, which keeps them strictly increasing.

use rand::Rng;

const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIMESTAMP_LEN: usize = 8;
const RANDOM_LEN: usize = 12;

/// Generator of chronologically ordered push IDs
#[derive(Debug, Default)]
pub struct PushIdGenerator {
    last_timestamp: Option<i64>,
    last_random: [u8; RANDOM_LEN],
}

impl PushIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next key for the current wall-clock time
    pub fn next_id(&mut self) -> String {
        self.next_id_at(chrono::Utc::now().timestamp_millis())
    }

    /// Next key for `timestamp_ms`
    pub fn next_id_at(&mut self, timestamp_ms: i64) -> String {
        if self.last_timestamp == Some(timestamp_ms) {
            self.increment_random();
        } else {
            let mut rng = rand::thread_rng();
            for slot in self.last_random.iter_mut() {
                *slot = rng.gen_range(0..64);
            }
            self.last_timestamp = Some(timestamp_ms);
        }

        let mut id = String::with_capacity(TIMESTAMP_LEN + RANDOM_LEN);

        let mut remaining = timestamp_ms.max(0) as u64;
        let mut stamp = [0u8; TIMESTAMP_LEN];
        for slot in stamp.iter_mut().rev() {
            *slot = PUSH_CHARS[(remaining % 64) as usize];
            remaining /= 64;
        }
        id.extend(stamp.iter().map(|&b| b as char));
        id.extend(self.last_random.iter().map(|&i| PUSH_CHARS[i as usize] as char));
        id
    }

    fn increment_random(&mut self) {
        for slot in self.last_random.iter_mut().rev() {
            if *slot == 63 {
                *slot = 0;
            } else {
                *slot += 1;
                return;
            }
        }
    }
}
