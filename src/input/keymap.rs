//! キーマップ
//!
//! キーシーケンスからウィジェット名へのトライ木。
//! あるシーケンスが完全な割り当てであり、かつより長い割り当ての接頭辞でもある場合を
//! 曖昧（Ambiguous）と呼ぶ。解決処理は割り当てを変更しないため `&self` で完結し、
//! 再割り当ては `&mut` 経由でのみ行われる。

use super::key::{Key, KeySequence};
use crate::error::{KeyMapError, KeyParseError};
use crate::widget::WidgetName;
use std::collections::HashMap;

/// キーマップ名
pub mod names {
    pub const EMACS: &str = "emacs";
    pub const VIINS: &str = "viins";
    pub const VICMD: &str = "vicmd";
    pub const VIOPP: &str = "viopp";
    pub const VISUAL: &str = "visual";
    pub const MENU: &str = "menu";
    pub const SAFE: &str = ".safe";
    /// 編集モードに応じた挿入用キーマップの別名
    pub const MAIN: &str = "main";
}

/// 解決結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// 完全一致（継続なし）
    Bound(&'a WidgetName),
    /// 完全一致かつより長い割り当ての接頭辞
    Ambiguous(&'a WidgetName),
    /// 接頭辞のみ（続きのキー待ち）
    Prefix,
    /// 一致なし
    Unbound,
}

impl<'a> Resolution<'a> {
    /// 一致したウィジェット
    pub fn widget(&self) -> Option<&'a WidgetName> {
        match *self {
            Resolution::Bound(w) | Resolution::Ambiguous(w) => Some(w),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    binding: Option<WidgetName>,
    children: HashMap<Key, Node>,
}

impl Node {
    fn is_empty(&self) -> bool {
        self.binding.is_none() && self.children.is_empty()
    }

    fn collect(&self, prefix: &mut Vec<Key>, out: &mut Vec<(KeySequence, WidgetName)>) {
        if let Some(widget) = &self.binding {
            out.push((KeySequence::multi(prefix.clone()), widget.clone()));
        }
        for (key, child) in &self.children {
            prefix.push(*key);
            child.collect(prefix, out);
            prefix.pop();
        }
    }

    /// 指定シーケンスの割り当てを外し、空になった部分木を刈り込む
    fn remove(&mut self, keys: &[Key]) -> Option<WidgetName> {
        match keys.split_first() {
            None => self.binding.take(),
            Some((first, rest)) => {
                let child = self.children.get_mut(first)?;
                let removed = child.remove(rest);
                if child.is_empty() {
                    self.children.remove(first);
                }
                removed
            }
        }
    }
}

/// 名前付きキーマップ
#[derive(Debug, Clone)]
pub struct KeyMap {
    name: String,
    root: Node,
    default_widget: Option<WidgetName>,
}

impl KeyMap {
    /// 空のキーマップを作成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: Node::default(),
            default_widget: None,
        }
    }

    /// 未一致の挿入可能キーに使うウィジェットを設定
    pub fn with_default_widget(mut self, widget: WidgetName) -> Self {
        self.default_widget = Some(widget);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_widget(&self) -> Option<&WidgetName> {
        self.default_widget.as_ref()
    }

    pub fn set_default_widget(&mut self, widget: Option<WidgetName>) {
        self.default_widget = widget;
    }

    /// 単一キーに対する既定ウィジェット（挿入可能な文字のみ対象）
    pub fn default_for(&self, key: &Key) -> Option<&WidgetName> {
        if key.is_insertable_char() {
            self.default_widget.as_ref()
        } else {
            None
        }
    }

    /// シーケンスにウィジェットを割り当てる
    ///
    /// 同じシーケンスの既存割り当ては置き換えるが、より長い割り当ては保持する。
    pub fn bind(&mut self, keys: &[Key], widget: impl Into<WidgetName>) {
        if keys.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for key in keys {
            node = node.children.entry(*key).or_default();
        }
        node.binding = Some(widget.into());
    }

    /// `"C-x C-u"` 形式の文字列で割り当てる
    pub fn bind_str(&mut self, keys: &str, widget: impl Into<WidgetName>) -> Result<(), KeyParseError> {
        let seq = KeySequence::parse(keys)?;
        self.bind(seq.as_slice(), widget);
        Ok(())
    }

    /// 割り当てを外す
    pub fn unbind(&mut self, keys: &[Key]) -> Option<WidgetName> {
        if keys.is_empty() {
            return None;
        }
        self.root.remove(keys)
    }

    /// 入力済みシーケンスを解決する
    pub fn resolve(&self, keys: &[Key]) -> Resolution<'_> {
        let mut node = &self.root;
        for key in keys {
            match node.children.get(key) {
                Some(child) => node = child,
                None => return Resolution::Unbound,
            }
        }

        match (&node.binding, node.children.is_empty()) {
            (Some(widget), true) => Resolution::Bound(widget),
            (Some(widget), false) => Resolution::Ambiguous(widget),
            (None, false) => Resolution::Prefix,
            (None, true) => Resolution::Unbound,
        }
    }

    /// 完全一致する割り当てのみ取得
    pub fn lookup(&self, keys: &[Key]) -> Option<&WidgetName> {
        self.resolve(keys).widget()
    }

    /// 全割り当てをシーケンス表記順で列挙
    pub fn bindings(&self) -> Vec<(KeySequence, WidgetName)> {
        let mut out = Vec::new();
        self.root.collect(&mut Vec::new(), &mut out);
        out.sort_by(|a, b| a.0.keys.cmp(&b.0.keys));
        out
    }

    /// ウィジェットに割り当てられたシーケンス一覧
    pub fn keys_for(&self, widget: &WidgetName) -> Vec<KeySequence> {
        self.bindings()
            .into_iter()
            .filter(|(_, w)| w == widget)
            .map(|(seq, _)| seq)
            .collect()
    }
}

/// セッションが持つキーマップ集合
#[derive(Debug, Clone, Default)]
pub struct KeyMaps {
    maps: HashMap<String, KeyMap>,
    main: Option<String>,
}

impl KeyMaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// キーマップを登録（同名は置き換え）
    pub fn insert(&mut self, map: KeyMap) {
        self.maps.insert(map.name().to_string(), map);
    }

    /// `main` 別名の参照先を設定
    pub fn set_main(&mut self, name: impl Into<String>) {
        self.main = Some(name.into());
    }

    fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        if name == names::MAIN {
            self.main.as_deref().unwrap_or(names::EMACS)
        } else {
            name
        }
    }

    pub fn get(&self, name: &str) -> Option<&KeyMap> {
        self.maps.get(self.canonical(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut KeyMap> {
        let name = self.canonical(name).to_string();
        self.maps.get_mut(&name)
    }

    /// 名前で取得し、存在しなければ `.safe` を返す
    pub fn get_or_safe(&self, name: &str) -> Option<&KeyMap> {
        self.get(name).or_else(|| self.maps.get(names::SAFE))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.maps.contains_key(self.canonical(name))
    }

    /// 登録済みキーマップ名（ソート済み）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.maps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// 名前付きキーマップへ割り当て
    pub fn bind(&mut self, map: &str, keys: &[Key], widget: impl Into<WidgetName>) -> Result<(), KeyMapError> {
        let target = self
            .get_mut(map)
            .ok_or_else(|| KeyMapError::UnknownKeyMap(map.to_string()))?;
        target.bind(keys, widget);
        Ok(())
    }

    /// 名前付きキーマップへ文字列表記で割り当て
    pub fn bind_str(&mut self, map: &str, keys: &str, widget: impl Into<WidgetName>) -> Result<(), KeyMapError> {
        let seq = KeySequence::parse(keys)?;
        self.bind(map, seq.as_slice(), widget)
    }

    /// 名前付きキーマップから割り当てを外す
    pub fn unbind(&mut self, map: &str, keys: &[Key]) -> Result<Option<WidgetName>, KeyMapError> {
        let target = self
            .get_mut(map)
            .ok_or_else(|| KeyMapError::UnknownKeyMap(map.to_string()))?;
        Ok(target.unbind(keys))
    }
}

/// オーバーレイを上から順に試し、最後に基底キーマップで解決する
///
/// 上位のキーマップが `Unbound` を返した場合のみ次のキーマップへ進む。
/// オーバーレイで明示的に `undefined-key` を割り当てたキーは通常の割り当てとして扱われ、
/// 下位へは漏れない。
pub fn resolve_layered<'a>(maps: &[&'a KeyMap], keys: &[Key]) -> Resolution<'a> {
    for map in maps {
        match map.resolve(keys) {
            Resolution::Unbound => continue,
            found => return found,
        }
    }
    Resolution::Unbound
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(s: &str) -> Vec<Key> {
        KeySequence::parse(s).unwrap().keys
    }

    #[test]
    fn test_resolve_bound_prefix_unbound() {
        let mut map = KeyMap::new("test");
        map.bind(&keys("C-x C-u"), "undo");
        map.bind(&keys("C-a"), "beginning-of-line");

        assert_eq!(map.resolve(&keys("C-a")), Resolution::Bound(&WidgetName::from("beginning-of-line")));
        assert_eq!(map.resolve(&keys("C-x")), Resolution::Prefix);
        assert_eq!(map.resolve(&keys("C-x C-u")).widget().map(WidgetName::as_str), Some("undo"));
        assert_eq!(map.resolve(&keys("C-x C-y")), Resolution::Unbound);
        assert_eq!(map.resolve(&keys("C-b")), Resolution::Unbound);
    }

    #[test]
    fn test_ambiguous_independent_of_bind_order() {
        let mut first = KeyMap::new("a");
        first.bind(&keys("a"), "w1");
        first.bind(&keys("a b"), "w2");

        let mut second = KeyMap::new("b");
        second.bind(&keys("a b"), "w2");
        second.bind(&keys("a"), "w1");

        for map in [&first, &second] {
            assert_eq!(map.resolve(&keys("a")), Resolution::Ambiguous(&WidgetName::from("w1")));
            assert_eq!(map.resolve(&keys("a b")), Resolution::Bound(&WidgetName::from("w2")));
        }
    }

    #[test]
    fn test_rebind_replaces_only_exact_sequence() {
        let mut map = KeyMap::new("test");
        map.bind(&keys("a"), "w1");
        map.bind(&keys("a b"), "w2");
        map.bind(&keys("a"), "w3");
        assert_eq!(map.lookup(&keys("a")).map(WidgetName::as_str), Some("w3"));
        assert_eq!(map.lookup(&keys("a b")).map(WidgetName::as_str), Some("w2"));
    }

    #[test]
    fn test_unbind_prunes_empty_nodes() {
        let mut map = KeyMap::new("test");
        map.bind(&keys("C-x C-u"), "undo");
        assert_eq!(map.unbind(&keys("C-x C-u")).map(|w| w.to_string()), Some("undo".to_string()));
        assert_eq!(map.resolve(&keys("C-x")), Resolution::Unbound);
        assert!(map.unbind(&keys("C-x")).is_none());
    }

    #[test]
    fn test_layered_overlay_fallback() {
        let mut base = KeyMap::new("base");
        base.bind(&keys("x"), "base-x");
        let mut overlay = KeyMap::new("overlay");
        overlay.bind(&keys("v"), "overlay-v");

        let layers = [&overlay, &base];
        assert_eq!(resolve_layered(&layers, &keys("v")).widget().map(WidgetName::as_str), Some("overlay-v"));
        assert_eq!(resolve_layered(&layers, &keys("x")).widget().map(WidgetName::as_str), Some("base-x"));
        assert_eq!(resolve_layered(&layers, &keys("y")), Resolution::Unbound);
    }

    #[test]
    fn test_explicit_undefined_key_masks_base() {
        let mut base = KeyMap::new("base");
        base.bind(&keys("x"), "base-x");
        let mut overlay = KeyMap::new("overlay");
        overlay.bind(&keys("x"), "undefined-key");

        let layers = [&overlay, &base];
        assert_eq!(
            resolve_layered(&layers, &keys("x")).widget().map(WidgetName::as_str),
            Some("undefined-key")
        );
    }

    #[test]
    fn test_default_widget_only_for_insertable() {
        let map = KeyMap::new("test").with_default_widget(WidgetName::from("self-insert"));
        assert!(map.default_for(&Key::char('q')).is_some());
        assert!(map.default_for(&Key::ctrl('q')).is_none());
    }

    #[test]
    fn test_keymaps_main_alias_and_safe() {
        let mut maps = KeyMaps::new();
        maps.insert(KeyMap::new(names::EMACS));
        maps.insert(KeyMap::new(names::VIINS));
        maps.insert(KeyMap::new(names::SAFE));

        assert_eq!(maps.get(names::MAIN).map(KeyMap::name), Some(names::EMACS));
        maps.set_main(names::VIINS);
        assert_eq!(maps.get(names::MAIN).map(KeyMap::name), Some(names::VIINS));
        assert_eq!(maps.get_or_safe("missing").map(KeyMap::name), Some(names::SAFE));
        assert!(matches!(
            maps.bind_str("missing", "a", "beep"),
            Err(KeyMapError::UnknownKeyMap(_))
        ));
    }

    #[test]
    fn test_bindings_listing() {
        let mut map = KeyMap::new("test");
        map.bind(&keys("b"), "w2");
        map.bind(&keys("a"), "w1");
        let listed: Vec<String> = map.bindings().into_iter().map(|(k, w)| format!("{}={}", k, w)).collect();
        assert_eq!(listed, vec!["a=w1", "b=w2"]);
        assert_eq!(map.keys_for(&WidgetName::from("w2")).len(), 1);
    }
}
