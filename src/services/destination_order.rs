// src/services/destination_order.rs

use std::collections::HashSet;

use uuid::Uuid;

use crate::{common::error::AppError, models::tour::TourDestination};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationPosition {
    pub destination_id: Uuid,
    pub position: i32,
}

/// A ordem do array vira a posição, sempre contígua a partir de 1.
pub fn resequence(ids: &[Uuid]) -> Vec<DestinationPosition> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| DestinationPosition {
            destination_id: *id,
            position: index as i32 + 1,
        })
        .collect()
}

/// Ordem atual segundo a coluna `position` (as linhas podem vir desordenadas).
pub fn current_order(rows: &[TourDestination]) -> Vec<Uuid> {
    let mut sorted: Vec<&TourDestination> = rows.iter().collect();
    sorted.sort_by_key(|d| d.position);
    sorted.into_iter().map(|d| d.destination_id).collect()
}

/// Remove o item do índice `index` e renumera o resto.
pub fn remove_at(order: &[Uuid], index: usize) -> Option<Vec<DestinationPosition>> {
    if index >= order.len() {
        return None;
    }
    let mut remaining = order.to_vec();
    remaining.remove(index);
    Some(resequence(&remaining))
}

pub fn remove_destination(order: &[Uuid], destination_id: Uuid) -> Option<Vec<DestinationPosition>> {
    let index = order.iter().position(|id| *id == destination_id)?;
    remove_at(order, index)
}

/// A nova ordem tem que ser uma permutação exata da atual.
pub fn reorder(current: &[Uuid], requested: &[Uuid]) -> Result<Vec<DestinationPosition>, AppError> {
    let current_set: HashSet<&Uuid> = current.iter().collect();
    let requested_set: HashSet<&Uuid> = requested.iter().collect();

    if requested.len() != current.len()
        || requested_set.len() != requested.len()
        || current_set != requested_set
    {
        return Err(AppError::invalid_field("destinationIds", "invalid_order"));
    }

    Ok(resequence(requested))
}

/// Destinos repetidos no formulário.
pub fn has_duplicates(ids: &[Uuid]) -> bool {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().any(|id| !seen.insert(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tour_aggregation::fixtures::destination;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn positions(list: &[DestinationPosition]) -> Vec<(Uuid, i32)> {
        list.iter().map(|p| (p.destination_id, p.position)).collect()
    }

    #[test]
    fn removing_from_middle_keeps_positions_contiguous() {
        let order = vec![id(1), id(2), id(3), id(4)];
        let result = remove_at(&order, 1).unwrap();
        assert_eq!(positions(&result), vec![(id(1), 1), (id(3), 2), (id(4), 3)]);
    }

    #[test]
    fn removing_first_and_last() {
        let order = vec![id(1), id(2), id(3)];
        assert_eq!(positions(&remove_at(&order, 0).unwrap()), vec![(id(2), 1), (id(3), 2)]);
        assert_eq!(positions(&remove_at(&order, 2).unwrap()), vec![(id(1), 1), (id(2), 2)]);
        assert!(remove_at(&order, 3).is_none());
    }

    #[test]
    fn remove_by_id_uses_stored_positions() {
        // Posições com buraco (1, 3, 7) vindas do banco
        let rows = vec![destination(1, 30, 7), destination(1, 10, 1), destination(1, 20, 3)];
        let order = current_order(&rows);
        assert_eq!(order, vec![id(10), id(20), id(30)]);

        let result = remove_destination(&order, id(20)).unwrap();
        assert_eq!(positions(&result), vec![(id(10), 1), (id(30), 2)]);
        assert!(remove_destination(&order, id(99)).is_none());
    }

    #[test]
    fn reorder_requires_same_set() {
        let current = vec![id(1), id(2), id(3)];
        let result = reorder(&current, &[id(3), id(1), id(2)]).unwrap();
        assert_eq!(positions(&result), vec![(id(3), 1), (id(1), 2), (id(2), 3)]);

        assert!(reorder(&current, &[id(1), id(2)]).is_err());
        assert!(reorder(&current, &[id(1), id(1), id(2)]).is_err());
        assert!(reorder(&current, &[id(1), id(2), id(4)]).is_err());
    }

    #[test]
    fn detects_duplicates() {
        assert!(has_duplicates(&[id(1), id(2), id(1)]));
        assert!(!has_duplicates(&[id(1), id(2)]));
    }
}
