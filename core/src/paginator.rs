/// Split `items` into pages of at most `page_size` entries.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<&[T]> {
    if page_size == 0 {
        return Vec::new();
    }
    items.chunks(page_size).collect()
}
