/// Runs `f` with `keys` removed from the environment, restoring the previous
/// values afterwards.
#[cfg(test)]
pub fn without_env<F>(keys: &[&str], f: F)
where
    F: FnOnce(),
{
    let old_vars: Vec<_> = keys.iter().map(|k| (*k, std::env::var(k).ok())).collect();

    for key in keys {
        std::env::remove_var(key);
    }

    f();

    for (key, old_value) in old_vars {
        match old_value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
}
