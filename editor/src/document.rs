use path_bool::{FillRule, PathVector};
use serde::{Deserialize, Serialize};

use crate::misc::EditorError;
use crate::utility_traits::SelectionDocument;

pub type ItemId = u64;

/// A vector path together with the fill rule its region is drawn with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
	pub path: PathVector,
	pub fill_rule: FillRule,
}

impl PathItem {
	pub fn new(path: PathVector, fill_rule: FillRule) -> Self {
		Self { path, fill_rule }
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DocumentItem {
	Path(PathItem),
	Text(String),
}

/// A flat document kept in memory, bottom item first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
	items: Vec<(ItemId, DocumentItem)>,
	selection: Vec<ItemId>,
	next_id: ItemId,
}

impl MemoryDocument {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_item(&mut self, item: DocumentItem) -> ItemId {
		let id = self.next_id;
		self.next_id += 1;
		self.items.push((id, item));
		id
	}

	pub fn item(&self, id: ItemId) -> Option<&DocumentItem> {
		self.items.iter().find(|(item_id, _)| *item_id == id).map(|(_, item)| item)
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

impl SelectionDocument for MemoryDocument {
	fn selection(&self) -> Vec<ItemId> {
		self.selection.clone()
	}

	fn path_item(&self, id: ItemId) -> Option<&PathItem> {
		match self.item(id)? {
			DocumentItem::Path(item) => Some(item),
			DocumentItem::Text(_) => None,
		}
	}

	fn replace_path(&mut self, id: ItemId, path: PathVector) -> Result<(), EditorError> {
		let (_, item) = self.items.iter_mut().find(|(item_id, _)| *item_id == id).ok_or(EditorError::UnknownItem(id))?;
		match item {
			DocumentItem::Path(item) => {
				item.path = path;
				Ok(())
			}
			DocumentItem::Text(_) => Err(EditorError::NotAPath(id)),
		}
	}

	fn add_path_item(&mut self, item: PathItem) -> ItemId {
		self.add_item(DocumentItem::Path(item))
	}

	fn remove_items(&mut self, ids: &[ItemId]) {
		self.items.retain(|(id, _)| !ids.contains(id));
		self.selection.retain(|id| !ids.contains(id));
	}

	fn set_selection(&mut self, ids: &[ItemId]) {
		self.selection = ids.iter().copied().filter(|&id| self.item(id).is_some()).collect();
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use path_bool::path_from_path_data;

	fn square() -> PathItem {
		PathItem::new(path_from_path_data("M 0,0 L 0,1 L 1,1 L 1,0 Z").unwrap(), FillRule::NonZero)
	}

	#[test]
	fn selection_skips_missing_items() {
		let mut document = MemoryDocument::new();
		let path = document.add_path_item(square());
		let text = document.add_item(DocumentItem::Text("label".to_string()));
		document.set_selection(&[text, 42, path]);
		assert_eq!(document.selection(), vec![text, path]);

		document.remove_items(&[text]);
		assert_eq!(document.selection(), vec![path]);
		assert_eq!(document.len(), 1);
	}

	#[test]
	fn only_paths_can_be_replaced() {
		let mut document = MemoryDocument::new();
		let path = document.add_path_item(square());
		let text = document.add_item(DocumentItem::Text("label".to_string()));

		assert!(document.path_item(text).is_none());
		assert!(matches!(document.replace_path(text, PathVector::default()), Err(EditorError::NotAPath(id)) if id == text));
		assert!(matches!(document.replace_path(7, PathVector::default()), Err(EditorError::UnknownItem(7))));

		document.replace_path(path, PathVector::default()).unwrap();
		assert!(document.path_item(path).unwrap().path.is_empty());
	}
}
