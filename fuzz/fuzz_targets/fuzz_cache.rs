#![no_main]
use libfuzzer_sys::fuzz_target;
use rescache::{LruSessionCache, ServerContext, SessionParams, MASTER_SECRET_LEN, SESSION_ID_LEN};
use rescache_types::{CryptoError, HashAlgId};

struct FixedServer;

impl ServerContext for FixedServer {
    fn random_bytes(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = (i as u8) ^ 0x5A;
        }
        Ok(())
    }

    fn preferred_hash(&self) -> HashAlgId {
        HashAlgId::Sha256
    }
}

fn tag_params(tag: u8) -> SessionParams {
    let mut p = SessionParams::default();
    p.session_id = [tag; SESSION_ID_LEN];
    p.version = 0x0300 | tag as u16;
    p.cipher_suite = 0xC000 | tag as u16;
    p.master_secret = [tag.wrapping_add(1); MASTER_SECRET_LEN];
    p
}

// Interpret the input as a save/load script against a small cache and check
// every observable result against a naive recency-list model.
fuzz_target!(|data: &[u8]| {
    let Some((&selector, script)) = data.split_first() else {
        return;
    };
    let store_len = match selector % 5 {
        0 => 0usize,
        1 => 99,
        2 => 100,
        3 => 500,
        _ => 1000,
    };
    let capacity = store_len / 100;

    let mut server = FixedServer;
    let mut cache = LruSessionCache::new(vec![0u8; store_len]);
    // Most-recently-used first
    let mut model: Vec<u8> = Vec::new();

    for op in script.chunks_exact(2) {
        let (is_save, tag) = ((op[0] & 1) == 0, op[1] % 16);
        if is_save {
            cache.save(&mut server, &tag_params(tag));
            if capacity > 0 && !model.contains(&tag) {
                if model.len() == capacity {
                    model.pop();
                }
                model.insert(0, tag);
            }
        } else {
            let mut p = SessionParams::default();
            p.session_id = [tag; SESSION_ID_LEN];
            let hit = cache.load(&mut p);
            let expected = model.contains(&tag);
            assert_eq!(hit, expected, "tag {tag} presence diverged");
            if hit {
                assert_eq!(p.version, 0x0300 | tag as u16);
                assert_eq!(p.cipher_suite, 0xC000 | tag as u16);
                assert_eq!(p.master_secret, [tag.wrapping_add(1); MASTER_SECRET_LEN]);
                let pos = model.iter().position(|&t| t == tag).unwrap();
                model.remove(pos);
                model.insert(0, tag);
            }
        }
        assert_eq!(cache.len(), model.len());
    }
});
