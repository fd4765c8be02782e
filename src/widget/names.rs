//! ウィジェット名の定数

use super::WidgetName;

pub const DIGIT_ARGUMENT: WidgetName = WidgetName::from_static("digit-argument");
pub const NEG_ARGUMENT: WidgetName = WidgetName::from_static("neg-argument");
pub const UNIVERSAL_ARGUMENT: WidgetName = WidgetName::from_static("universal-argument");
pub const VI_DIGIT_OR_BEGINNING_OF_LINE: WidgetName = WidgetName::from_static("vi-digit-or-beginning-of-line");
pub const FORWARD_CHAR: WidgetName = WidgetName::from_static("forward-char");
pub const BACKWARD_CHAR: WidgetName = WidgetName::from_static("backward-char");
pub const FORWARD_WORD: WidgetName = WidgetName::from_static("forward-word");
pub const BACKWARD_WORD: WidgetName = WidgetName::from_static("backward-word");
pub const EMACS_FORWARD_WORD: WidgetName = WidgetName::from_static("emacs-forward-word");
pub const EMACS_BACKWARD_WORD: WidgetName = WidgetName::from_static("emacs-backward-word");
pub const BEGINNING_OF_LINE: WidgetName = WidgetName::from_static("beginning-of-line");
pub const END_OF_LINE: WidgetName = WidgetName::from_static("end-of-line");
pub const UP_LINE: WidgetName = WidgetName::from_static("up-line");
pub const DOWN_LINE: WidgetName = WidgetName::from_static("down-line");
pub const BEGINNING_OF_BUFFER_OR_HISTORY: WidgetName = WidgetName::from_static("beginning-of-buffer-or-history");
pub const END_OF_BUFFER_OR_HISTORY: WidgetName = WidgetName::from_static("end-of-buffer-or-history");
pub const BEGINNING_OF_LINE_HIST: WidgetName = WidgetName::from_static("beginning-of-line-hist");
pub const END_OF_LINE_HIST: WidgetName = WidgetName::from_static("end-of-line-hist");
pub const SET_MARK_COMMAND: WidgetName = WidgetName::from_static("set-mark-command");
pub const EXCHANGE_POINT_AND_MARK: WidgetName = WidgetName::from_static("exchange-point-and-mark");
pub const CHARACTER_SEARCH: WidgetName = WidgetName::from_static("character-search");
pub const CHARACTER_SEARCH_BACKWARD: WidgetName = WidgetName::from_static("character-search-backward");
pub const WHAT_CURSOR_POSITION: WidgetName = WidgetName::from_static("what-cursor-position");
pub const SELF_INSERT: WidgetName = WidgetName::from_static("self-insert");
pub const SELF_INSERT_UNMETA: WidgetName = WidgetName::from_static("self-insert-unmeta");
pub const BACKWARD_DELETE_CHAR: WidgetName = WidgetName::from_static("backward-delete-char");
pub const DELETE_CHAR: WidgetName = WidgetName::from_static("delete-char");
pub const BACKWARD_DELETE_WORD: WidgetName = WidgetName::from_static("backward-delete-word");
pub const DELETE_WORD: WidgetName = WidgetName::from_static("delete-word");
pub const TRANSPOSE_CHARS: WidgetName = WidgetName::from_static("transpose-chars");
pub const TRANSPOSE_WORDS: WidgetName = WidgetName::from_static("transpose-words");
pub const CAPITALIZE_WORD: WidgetName = WidgetName::from_static("capitalize-word");
pub const UP_CASE_WORD: WidgetName = WidgetName::from_static("up-case-word");
pub const DOWN_CASE_WORD: WidgetName = WidgetName::from_static("down-case-word");
pub const QUOTED_INSERT: WidgetName = WidgetName::from_static("quoted-insert");
pub const OVERWRITE_MODE: WidgetName = WidgetName::from_static("overwrite-mode");
pub const INSERT_COMMENT: WidgetName = WidgetName::from_static("insert-comment");
pub const COPY_PREV_WORD: WidgetName = WidgetName::from_static("copy-prev-word");
pub const INSERT_CLOSE_PAREN: WidgetName = WidgetName::from_static("insert-close-paren");
pub const INSERT_CLOSE_CURLY: WidgetName = WidgetName::from_static("insert-close-curly");
pub const INSERT_CLOSE_SQUARE: WidgetName = WidgetName::from_static("insert-close-square");
pub const MAGIC_SPACE: WidgetName = WidgetName::from_static("magic-space");
pub const KILL_WORD: WidgetName = WidgetName::from_static("kill-word");
pub const BACKWARD_KILL_WORD: WidgetName = WidgetName::from_static("backward-kill-word");
pub const KILL_LINE: WidgetName = WidgetName::from_static("kill-line");
pub const BACKWARD_KILL_LINE: WidgetName = WidgetName::from_static("backward-kill-line");
pub const KILL_WHOLE_LINE: WidgetName = WidgetName::from_static("kill-whole-line");
pub const KILL_BUFFER: WidgetName = WidgetName::from_static("kill-buffer");
pub const KILL_REGION: WidgetName = WidgetName::from_static("kill-region");
pub const COPY_REGION_AS_KILL: WidgetName = WidgetName::from_static("copy-region-as-kill");
pub const YANK: WidgetName = WidgetName::from_static("yank");
pub const YANK_POP: WidgetName = WidgetName::from_static("yank-pop");
pub const UNDO: WidgetName = WidgetName::from_static("undo");
pub const REDO: WidgetName = WidgetName::from_static("redo");
pub const VI_UNDO_CHANGE: WidgetName = WidgetName::from_static("vi-undo-change");
pub const SPLIT_UNDO: WidgetName = WidgetName::from_static("split-undo");
pub const UP_HISTORY: WidgetName = WidgetName::from_static("up-history");
pub const DOWN_HISTORY: WidgetName = WidgetName::from_static("down-history");
pub const UP_LINE_OR_HISTORY: WidgetName = WidgetName::from_static("up-line-or-history");
pub const DOWN_LINE_OR_HISTORY: WidgetName = WidgetName::from_static("down-line-or-history");
pub const UP_LINE_OR_SEARCH: WidgetName = WidgetName::from_static("up-line-or-search");
pub const DOWN_LINE_OR_SEARCH: WidgetName = WidgetName::from_static("down-line-or-search");
pub const BEGINNING_OF_HISTORY: WidgetName = WidgetName::from_static("beginning-of-history");
pub const END_OF_HISTORY: WidgetName = WidgetName::from_static("end-of-history");
pub const HISTORY_SEARCH_BACKWARD: WidgetName = WidgetName::from_static("history-search-backward");
pub const HISTORY_SEARCH_FORWARD: WidgetName = WidgetName::from_static("history-search-forward");
pub const HISTORY_BEGINNING_SEARCH_BACKWARD: WidgetName = WidgetName::from_static("history-beginning-search-backward");
pub const HISTORY_BEGINNING_SEARCH_FORWARD: WidgetName = WidgetName::from_static("history-beginning-search-forward");
pub const HISTORY_INCREMENTAL_SEARCH_BACKWARD: WidgetName = WidgetName::from_static("history-incremental-search-backward");
pub const HISTORY_INCREMENTAL_SEARCH_FORWARD: WidgetName = WidgetName::from_static("history-incremental-search-forward");
pub const HISTORY_INCREMENTAL_PATTERN_SEARCH_BACKWARD: WidgetName = WidgetName::from_static("history-incremental-pattern-search-backward");
pub const HISTORY_INCREMENTAL_PATTERN_SEARCH_FORWARD: WidgetName = WidgetName::from_static("history-incremental-pattern-search-forward");
pub const INSERT_LAST_WORD: WidgetName = WidgetName::from_static("insert-last-word");
pub const INFER_NEXT_HISTORY: WidgetName = WidgetName::from_static("infer-next-history");
pub const EXPAND_HISTORY: WidgetName = WidgetName::from_static("expand-history");
pub const VI_FETCH_HISTORY: WidgetName = WidgetName::from_static("vi-fetch-history");
pub const VI_UP_LINE_OR_HISTORY: WidgetName = WidgetName::from_static("vi-up-line-or-history");
pub const VI_DOWN_LINE_OR_HISTORY: WidgetName = WidgetName::from_static("vi-down-line-or-history");
pub const VI_HISTORY_SEARCH_BACKWARD: WidgetName = WidgetName::from_static("vi-history-search-backward");
pub const VI_HISTORY_SEARCH_FORWARD: WidgetName = WidgetName::from_static("vi-history-search-forward");
pub const VI_REPEAT_SEARCH: WidgetName = WidgetName::from_static("vi-repeat-search");
pub const VI_REV_REPEAT_SEARCH: WidgetName = WidgetName::from_static("vi-rev-repeat-search");
pub const COMPLETE_WORD: WidgetName = WidgetName::from_static("complete-word");
pub const COMPLETE_PREFIX: WidgetName = WidgetName::from_static("complete-prefix");
pub const EXPAND_OR_COMPLETE: WidgetName = WidgetName::from_static("expand-or-complete");
pub const EXPAND_OR_COMPLETE_PREFIX: WidgetName = WidgetName::from_static("expand-or-complete-prefix");
pub const MENU_COMPLETE: WidgetName = WidgetName::from_static("menu-complete");
pub const REVERSE_MENU_COMPLETE: WidgetName = WidgetName::from_static("reverse-menu-complete");
pub const MENU_SELECT: WidgetName = WidgetName::from_static("menu-select");
pub const MENU_EXPAND_OR_COMPLETE: WidgetName = WidgetName::from_static("menu-expand-or-complete");
pub const LIST_CHOICES: WidgetName = WidgetName::from_static("list-choices");
pub const DELETE_CHAR_OR_LIST: WidgetName = WidgetName::from_static("delete-char-or-list");
pub const ACCEPT_LINE: WidgetName = WidgetName::from_static("accept-line");
pub const ABORT: WidgetName = WidgetName::from_static("abort");
pub const BEEP: WidgetName = WidgetName::from_static("beep");
pub const UNDEFINED_KEY: WidgetName = WidgetName::from_static("undefined-key");
pub const CLEAR_SCREEN: WidgetName = WidgetName::from_static("clear-screen");
pub const REDISPLAY: WidgetName = WidgetName::from_static("redisplay");
pub const RECURSIVE_EDIT: WidgetName = WidgetName::from_static("recursive-edit");
pub const EXECUTE_NAMED_CMD: WidgetName = WidgetName::from_static("execute-named-cmd");
pub const DO_LOWERCASE_VERSION: WidgetName = WidgetName::from_static("do-lowercase-version");
pub const EMACS_EDITING_MODE: WidgetName = WidgetName::from_static("emacs-editing-mode");
pub const VI_CMD_MODE: WidgetName = WidgetName::from_static("vi-cmd-mode");
pub const VI_INSERT: WidgetName = WidgetName::from_static("vi-insert");
pub const VI_INSERT_BOL: WidgetName = WidgetName::from_static("vi-insert-bol");
pub const VI_ADD_NEXT: WidgetName = WidgetName::from_static("vi-add-next");
pub const VI_ADD_EOL: WidgetName = WidgetName::from_static("vi-add-eol");
pub const VISUAL_MODE: WidgetName = WidgetName::from_static("visual-mode");
pub const VISUAL_LINE_MODE: WidgetName = WidgetName::from_static("visual-line-mode");
pub const VI_FORWARD_CHAR: WidgetName = WidgetName::from_static("vi-forward-char");
pub const VI_BACKWARD_CHAR: WidgetName = WidgetName::from_static("vi-backward-char");
pub const VI_FORWARD_WORD: WidgetName = WidgetName::from_static("vi-forward-word");
pub const VI_FORWARD_BLANK_WORD: WidgetName = WidgetName::from_static("vi-forward-blank-word");
pub const VI_FORWARD_WORD_END: WidgetName = WidgetName::from_static("vi-forward-word-end");
pub const VI_FORWARD_BLANK_WORD_END: WidgetName = WidgetName::from_static("vi-forward-blank-word-end");
pub const VI_BACKWARD_WORD: WidgetName = WidgetName::from_static("vi-backward-word");
pub const VI_BACKWARD_BLANK_WORD: WidgetName = WidgetName::from_static("vi-backward-blank-word");
pub const VI_BACKWARD_WORD_END: WidgetName = WidgetName::from_static("vi-backward-word-end");
pub const VI_BACKWARD_BLANK_WORD_END: WidgetName = WidgetName::from_static("vi-backward-blank-word-end");
pub const VI_BEGINNING_OF_LINE: WidgetName = WidgetName::from_static("vi-beginning-of-line");
pub const VI_END_OF_LINE: WidgetName = WidgetName::from_static("vi-end-of-line");
pub const VI_FIRST_NON_BLANK: WidgetName = WidgetName::from_static("vi-first-non-blank");
pub const VI_GOTO_COLUMN: WidgetName = WidgetName::from_static("vi-goto-column");
pub const VI_MATCH_BRACKET: WidgetName = WidgetName::from_static("vi-match-bracket");
pub const VI_FIND_NEXT_CHAR: WidgetName = WidgetName::from_static("vi-find-next-char");
pub const VI_FIND_NEXT_CHAR_SKIP: WidgetName = WidgetName::from_static("vi-find-next-char-skip");
pub const VI_FIND_PREV_CHAR: WidgetName = WidgetName::from_static("vi-find-prev-char");
pub const VI_FIND_PREV_CHAR_SKIP: WidgetName = WidgetName::from_static("vi-find-prev-char-skip");
pub const VI_REPEAT_FIND: WidgetName = WidgetName::from_static("vi-repeat-find");
pub const VI_REV_REPEAT_FIND: WidgetName = WidgetName::from_static("vi-rev-repeat-find");
pub const VI_DELETE: WidgetName = WidgetName::from_static("vi-delete");
pub const VI_CHANGE_TO: WidgetName = WidgetName::from_static("vi-change-to");
pub const VI_YANK: WidgetName = WidgetName::from_static("vi-yank");
pub const VI_OPER_SWAP_CASE: WidgetName = WidgetName::from_static("vi-oper-swap-case");
pub const VI_DELETE_CHAR: WidgetName = WidgetName::from_static("vi-delete-char");
pub const VI_BACKWARD_DELETE_CHAR: WidgetName = WidgetName::from_static("vi-backward-delete-char");
pub const VI_KILL_EOL: WidgetName = WidgetName::from_static("vi-kill-eol");
pub const VI_CHANGE_EOL: WidgetName = WidgetName::from_static("vi-change-eol");
pub const VI_CHANGE_WHOLE_LINE: WidgetName = WidgetName::from_static("vi-change-whole-line");
pub const VI_YANK_WHOLE_LINE: WidgetName = WidgetName::from_static("vi-yank-whole-line");
pub const VI_YANK_EOL: WidgetName = WidgetName::from_static("vi-yank-eol");
pub const VI_SUBSTITUTE: WidgetName = WidgetName::from_static("vi-substitute");
pub const VI_REPLACE_CHARS: WidgetName = WidgetName::from_static("vi-replace-chars");
pub const VI_REPLACE: WidgetName = WidgetName::from_static("vi-replace");
pub const VI_SWAP_CASE: WidgetName = WidgetName::from_static("vi-swap-case");
pub const VI_PUT_AFTER: WidgetName = WidgetName::from_static("vi-put-after");
pub const VI_PUT_BEFORE: WidgetName = WidgetName::from_static("vi-put-before");
pub const PUT_REPLACE_SELECTION: WidgetName = WidgetName::from_static("put-replace-selection");
pub const VI_JOIN: WidgetName = WidgetName::from_static("vi-join");
pub const VI_OPEN_LINE_ABOVE: WidgetName = WidgetName::from_static("vi-open-line-above");
pub const VI_OPEN_LINE_BELOW: WidgetName = WidgetName::from_static("vi-open-line-below");
pub const VI_INSERT_COMMENT: WidgetName = WidgetName::from_static("vi-insert-comment");
pub const VI_BACKWARD_KILL_WORD: WidgetName = WidgetName::from_static("vi-backward-kill-word");
pub const VI_KILL_LINE: WidgetName = WidgetName::from_static("vi-kill-line");
pub const VI_QUOTED_INSERT: WidgetName = WidgetName::from_static("vi-quoted-insert");
