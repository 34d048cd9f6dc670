//! Глобальный переключатель автоматического роста словарей.
//!
//! Пока рост выключен (например, на время снапшота, чтобы не трогать
//! страницы памяти), словарь растёт только при сильной перегрузке:
//! `used / size > force_resize_ratio`.

use std::sync::atomic::{AtomicBool, Ordering};

static RESIZE_ENABLED: AtomicBool = AtomicBool::new(true);

/// Разрешает автоматический рост и `Dict::resize`.
pub fn enable_resize() {
    RESIZE_ENABLED.store(true, Ordering::SeqCst);
}

/// Запрещает автоматический рост (кроме принудительного) и `Dict::resize`.
pub fn disable_resize() {
    RESIZE_ENABLED.store(false, Ordering::SeqCst);
}

/// Текущее состояние переключателя.
pub fn resize_enabled() -> bool {
    RESIZE_ENABLED.load(Ordering::SeqCst)
}

/// Guard, выключающий рост до конца своей жизни.
///
/// При удалении восстанавливает состояние, бывшее до создания.
#[must_use = "рост снова включится сразу после удаления guard"]
#[derive(Debug)]
pub struct ResizeSuppression {
    previous: bool,
}

/// Выключает рост и возвращает guard, который вернёт прежнее состояние.
pub fn suppress_resize() -> ResizeSuppression {
    let previous = RESIZE_ENABLED.swap(false, Ordering::SeqCst);
    ResizeSuppression { previous }
}

impl Drop for ResizeSuppression {
    fn drop(&mut self) {
        RESIZE_ENABLED.store(self.previous, Ordering::SeqCst);
    }
}
