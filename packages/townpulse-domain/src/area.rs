/// Area names are the join key between the two stores. Both sides are
/// compared through this normalization, never raw.
pub fn normalize_area_name(raw: &str) -> String {
	raw.trim().to_uppercase()
}
