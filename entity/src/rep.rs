use serde::{Deserialize, Serialize};

/// Sales representative from the fixed roster.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Rep {
    Alice,
    Bob,
    Carol,
    David,
}

impl Rep {
    pub const ROSTER: [Rep; 4] = [Rep::Alice, Rep::Bob, Rep::Carol, Rep::David];

    pub fn name(self) -> &'static str {
        match self {
            Rep::Alice => "Alice",
            Rep::Bob => "Bob",
            Rep::Carol => "Carol",
            Rep::David => "David",
        }
    }
}

impl std::fmt::Display for Rep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
