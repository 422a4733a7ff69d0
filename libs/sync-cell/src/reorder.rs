use crate::error::SyncError;

/// Moves the element at `from` so that it ends up at index `to`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), SyncError> {
    if from >= items.len() || to >= items.len() {
        return Err(SyncError::validation(format!(
            "Posisi tidak valid: {} -> {} (jumlah {})",
            from,
            to,
            items.len()
        )));
    }

    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_last_to_front() {
        let mut items = vec!["A", "B", "C"];
        move_item(&mut items, 2, 0).unwrap();
        assert_eq!(items, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_move_front_to_back() {
        let mut items = vec!["A", "B", "C"];
        move_item(&mut items, 0, 2).unwrap();
        assert_eq!(items, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut items = vec!["A"];
        assert!(move_item(&mut items, 0, 1).is_err());
        assert_eq!(items, vec!["A"]);
    }
}
