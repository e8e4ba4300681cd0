pub mod alignment;
pub mod bag;
pub mod record;
pub mod translate;

pub use alignment::Alignment;
pub use bag::SeqBag;
pub use record::Sequence;

/// Strand a reading frame was taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}
