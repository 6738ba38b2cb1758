use super::LayerId;
use serde::{Deserialize, Serialize};

/// A named, ordered group of planes. Lower `order` is drawn first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub order: u32,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>, order: u32) -> Self {
        Self {
            id,
            name: name.into(),
            order,
        }
    }
}

/// Default layer name for the `index`-th layer: A, B, ..., Z, AA, AB, ...
pub fn layer_name_for_index(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
