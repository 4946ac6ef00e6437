//! Drag feedback ordering inside a container.
//!
//! While a node is dragged over its siblings, the canvas previews where everything would end
//! up. Containers with more than one column lay their children out on a grid, so the preview
//! moves items across rows and columns instead of along a single axis. None of this touches
//! the tree: the drop itself always goes through [`FormTree::move_node`].
//!
//! [`FormTree::move_node`]: super::forest::FormTree::move_node

use super::component::Props;
use super::forest::NodeRef;

/// Layout used to compute drag feedback for a sequence of siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortingStrategy {
    /// One item per row. Used for the canvas root and single-column containers.
    #[default]
    VerticalList,
    /// Items flow left to right, `columns` per row.
    Grid { columns: u32 },
}

/// Position of an item in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
}

/// Displacement of an item in the preview, in rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shift {
    pub rows: isize,
    pub columns: isize,
}

impl SortingStrategy {
    pub fn for_props(props: &Props) -> Self {
        match props.columns() {
            0 | 1 => SortingStrategy::VerticalList,
            columns => SortingStrategy::Grid { columns },
        }
    }

    /// Strategy for the children of `container`.
    pub fn for_container(container: NodeRef<'_>) -> Self {
        if container.kind().has_grid() {
            Self::for_props(container.props())
        } else {
            SortingStrategy::VerticalList
        }
    }

    pub fn columns(self) -> usize {
        match self {
            SortingStrategy::VerticalList => 1,
            SortingStrategy::Grid { columns } => columns.max(1) as usize,
        }
    }

    pub fn cell(self, index: usize) -> Cell {
        let columns = self.columns();
        Cell {
            row: index / columns,
            column: index % columns,
        }
    }

    /// Order of `items` with the one at `from` moved to `to`.
    ///
    /// Out-of-range positions leave the order as is.
    pub fn preview_order<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
        let mut order = items.to_vec();
        if from < order.len() && to < order.len() {
            let item = order.remove(from);
            order.insert(to, item);
        }
        order
    }

    /// How far the item at `index` travels while the item at `active` hovers `over`.
    pub fn shift(self, index: usize, active: usize, over: usize) -> Shift {
        let target = if index == active {
            over
        } else if active < over && (active + 1..=over).contains(&index) {
            index - 1
        } else if over < active && (over..active).contains(&index) {
            index + 1
        } else {
            index
        };

        let from = self.cell(index);
        let to = self.cell(target);
        Shift {
            rows: to.row as isize - from.row as isize,
            columns: to.column as isize - from.column as isize,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tree::component::ComponentKind;

    #[test]
    fn strategy_follows_columns() {
        let mut props = ComponentKind::Container.default_props();
        assert_eq!(
            SortingStrategy::for_props(&props),
            SortingStrategy::VerticalList
        );

        props.set("columns", json!(3));
        assert_eq!(
            SortingStrategy::for_props(&props),
            SortingStrategy::Grid { columns: 3 }
        );
    }

    #[test]
    fn grid_cells() {
        let grid = SortingStrategy::Grid { columns: 3 };
        assert_eq!(grid.cell(0), Cell { row: 0, column: 0 });
        assert_eq!(grid.cell(4), Cell { row: 1, column: 1 });
        assert_eq!(SortingStrategy::VerticalList.cell(4), Cell { row: 4, column: 0 });
    }

    #[test]
    fn preview_order_moves_one_item() {
        let items = ["a", "b", "c", "d"];
        assert_eq!(
            SortingStrategy::preview_order(&items, 0, 2),
            ["b", "c", "a", "d"]
        );
        assert_eq!(
            SortingStrategy::preview_order(&items, 3, 1),
            ["a", "d", "b", "c"]
        );
        assert_eq!(SortingStrategy::preview_order(&items, 0, 9), items);
    }

    #[test]
    fn grid_shift_wraps_rows() {
        let grid = SortingStrategy::Grid { columns: 2 };
        assert_eq!(grid.shift(0, 0, 3), Shift { rows: 1, columns: 1 });
        assert_eq!(grid.shift(1, 0, 3), Shift { rows: 0, columns: -1 });
        assert_eq!(grid.shift(2, 0, 3), Shift { rows: -1, columns: 1 });
        assert_eq!(grid.shift(3, 0, 3), Shift { rows: 0, columns: -1 });
        assert_eq!(grid.shift(4, 0, 3), Shift::default());
    }

    #[test]
    fn list_shift_is_vertical() {
        let list = SortingStrategy::VerticalList;
        assert_eq!(list.shift(1, 0, 2), Shift { rows: -1, columns: 0 });
        assert_eq!(list.shift(0, 2, 0), Shift { rows: 1, columns: 0 });
        assert_eq!(list.shift(2, 2, 0), Shift { rows: -2, columns: 0 });
    }
}
