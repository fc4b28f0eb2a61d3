use sha1::{Digest, Sha1};

pub fn sha1(payload: &str) -> String {
    let hash = Sha1::digest(payload);
    base16ct::lower::encode_string(&hash)
}


#[cfg(test)]
mod utils_tests {
    use crate::utils::sha1;

    #[test]
    fn sha1_hex() {
        assert_eq!(sha1("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(sha1("").len(), 40);
    }
}
