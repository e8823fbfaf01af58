use uuid::Uuid;

/// Actor recorded in the audit log for changes made through the admin listener.
pub(super) const ADMIN_ACTOR: &str = "admin";

/// Parse submitted ids, skipping anything that is not a uuid.
pub(super) fn parse_id_list(values: &[String]) -> Vec<Uuid> {
    values
        .iter()
        .filter_map(|value| Uuid::parse_str(value.trim()).ok())
        .collect()
}
