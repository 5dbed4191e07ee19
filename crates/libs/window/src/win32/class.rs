use std::sync::atomic::{AtomicU32, Ordering};

//window classes are registered once per window, so every name must be fresh
pub struct ClassNames {
    next: AtomicU32,
}

impl ClassNames {
    pub const fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }

    pub fn next(&self, title: &str) -> String {
        let id = self.next.fetch_add(1, Ordering::Relaxed);

        //class names are limited to 256 utf-16 units
        let title: String = title.chars().filter(|&c| c != '\0').take(200).collect();

        format!("{}{}", title, id)
    }
}

//lives for the whole process, never reset
pub static CLASS_NAMES: ClassNames = ClassNames::starting_at(1);
