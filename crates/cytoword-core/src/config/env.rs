/// Environment access seam; production reads the process environment.
pub trait EnvLookup {
    fn get(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        self(name)
    }
}

#[must_use]
pub(super) fn read_non_empty_env(env: &impl EnvLookup, name: &str) -> Option<String> {
    env.get(name)
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[must_use]
pub(super) fn read_env_usize(
    env: &impl EnvLookup,
    name: &str,
    default_value: usize,
    min_value: usize,
) -> usize {
    env.get(name)
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| *value >= min_value)
        .unwrap_or(default_value)
}

#[must_use]
pub(super) fn read_env_u32(
    env: &impl EnvLookup,
    name: &str,
    default_value: u32,
    min_value: u32,
) -> u32 {
    env.get(name)
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|value| *value >= min_value)
        .unwrap_or(default_value)
}

#[must_use]
pub(super) fn read_env_u64(env: &impl EnvLookup, name: &str) -> Option<u64> {
    env.get(name)
        .and_then(|raw| raw.trim().parse::<u64>().ok())
}
