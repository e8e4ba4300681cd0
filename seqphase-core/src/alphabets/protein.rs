use crate::alphabets::Alphabet;
use std::sync::LazyLock;

static IUPAC: LazyLock<Alphabet> = LazyLock::new(|| {
    Alphabet::new(&b"ABCDEFGHIJKLMNOPQRSTUVWXYZ*abcdefghijklmnopqrstuvwxyz"[..])
});

pub fn iupac_alphabet() -> &'static Alphabet {
    &IUPAC
}
