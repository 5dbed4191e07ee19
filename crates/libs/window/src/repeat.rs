use std::collections::HashMap;

use crate::keycode::Keycode;

//counts presses of a held key since its last release,
//for platforms whose key events carry no repeat information
#[derive(Debug, Default, Clone)]
pub struct KeyRepeatTable {
    counts: HashMap<Keycode, u8>,
}

impl KeyRepeatTable {
    pub fn new() -> Self {
        Self::default()
    }

    //returns the count before this press
    pub fn press(&mut self, key: Keycode) -> u8 {
        let count = self.counts.entry(key).or_insert(0);
        let previous = *count;
        *count = count.saturating_add(1);
        previous
    }

    pub fn release(&mut self, key: Keycode) {
        self.counts.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_counts_up_from_zero() {
        let mut table = KeyRepeatTable::new();

        let counts: Vec<u8> = (0..5).map(|_| table.press(Keycode::W)).collect();

        assert_eq!(counts, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn count_saturates() {
        let mut table = KeyRepeatTable::new();

        let counts: Vec<u8> = (0..300).map(|_| table.press(Keycode::A)).collect();

        let expected: Vec<u8> = (0..300).map(|n: u32| n.min(255) as u8).collect();
        assert_eq!(counts, expected);
        assert_eq!(table.press(Keycode::A), 255);
    }

    #[test]
    fn release_resets_that_key_only() {
        let mut table = KeyRepeatTable::new();

        table.press(Keycode::A);
        table.press(Keycode::A);
        table.press(Keycode::S);
        table.release(Keycode::A);

        assert_eq!(table.press(Keycode::A), 0);
        assert_eq!(table.press(Keycode::S), 1);
    }

    #[test]
    fn release_of_unpressed_key() {
        let mut table = KeyRepeatTable::new();

        table.release(Keycode::Escape);

        assert_eq!(table.press(Keycode::Escape), 0);
    }
}
