use serde::Serialize;

/// Print a serializable response as pretty JSON.
///
/// Text rendering is per-command — each handler knows how its report reads —
/// so this module only owns the machine-readable half.
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
