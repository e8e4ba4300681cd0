use crate::alphabets::is_gap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    pub name: Box<str>,
    pub seq: Vec<u8>,
    pub comment: Option<Box<str>>,
}

impl Sequence {
    pub fn new(name: impl Into<Box<str>>, seq: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            seq: seq.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<Box<str>>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<Box<str>>) {
        self.name = name.into();
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.seq
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.seq
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Lossy view for logs and error messages.
    pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.seq)
    }

    /// Copy of this sequence with gap symbols removed.
    pub fn ungapped(&self) -> Self {
        Self {
            name: self.name.clone(),
            seq: self.seq.iter().copied().filter(|&b| !is_gap(b)).collect(),
            comment: self.comment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_and_access() {
        let s = Sequence::new("seq1", b"AC-GT".to_vec()).with_comment("some desc");
        assert_eq!(s.name(), "seq1");
        assert_eq!(s.comment(), Some("some desc"));
        assert_eq!(s.as_bytes(), b"AC-GT");
        assert_eq!(s.len(), 5);
        assert!(!s.is_empty());
    }

    #[test]
    fn ungapped_strips_gap_symbols() {
        let s = Sequence::new("seq1", b"A-C.G?T".to_vec());
        let u = s.ungapped();
        assert_eq!(u.as_bytes(), b"ACGT");
        assert_eq!(u.name(), "seq1");
        // original is untouched
        assert_eq!(s.len(), 7);
    }
}
