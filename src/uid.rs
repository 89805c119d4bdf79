use rand::{distributions::Alphanumeric, Rng};

/// Length of the public user identifier.
pub const USER_UID_LEN: usize = 16;

/// Random id drawn from `[0-9A-Za-z]`. Uniqueness is left to the store.
pub fn generate(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
