use std::fmt;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Идентификатор узла `List`. Валиден, пока узел не удалён.
    pub struct NodeId;
}

/// Направление обхода списка.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// От головы к хвосту.
    FromHead,
    /// От хвоста к голове.
    FromTail,
}

#[derive(Debug, Clone)]
struct ListNode<T> {
    value: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Двусвязный список с узлами в арене.
///
/// Узлы адресуются `NodeId`, поэтому вставка до/после узла и удаление
/// узла выполняются за O(1) без заимствования списка между операциями.
#[derive(Clone)]
pub struct List<T> {
    nodes: SlotMap<NodeId, ListNode<T>>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

/// Итератор по значениям списка (разделяемая ссылка).
pub struct ListIter<'a, T> {
    list: &'a List<T>,
    next: Option<NodeId>,
    direction: Direction,
    remaining: usize,
}

/// Курсор, не держащий заимствование списка.
///
/// `next` возвращает текущий узел и сразу запоминает следующий, поэтому
/// возвращённый узел можно удалить до следующего вызова.
#[derive(Debug, Clone)]
pub struct Cursor {
    next: Option<NodeId>,
    direction: Direction,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<T> List<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Головной узел.
    #[inline]
    pub fn first(&self) -> Option<NodeId> {
        self.head
    }

    /// Хвостовой узел.
    #[inline]
    pub fn last(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn next_node(
        &self,
        node: NodeId,
    ) -> Option<NodeId> {
        self.nodes.get(node)?.next
    }

    pub fn prev_node(
        &self,
        node: NodeId,
    ) -> Option<NodeId> {
        self.nodes.get(node)?.prev
    }

    pub fn value(
        &self,
        node: NodeId,
    ) -> Option<&T> {
        self.nodes.get(node).map(|n| &n.value)
    }

    pub fn value_mut(
        &mut self,
        node: NodeId,
    ) -> Option<&mut T> {
        self.nodes.get_mut(node).map(|n| &mut n.value)
    }

    /// Добавляет значение в голову списка.
    pub fn push_front(
        &mut self,
        value: T,
    ) -> NodeId {
        let id = self.nodes.insert(ListNode {
            value,
            prev: None,
            next: self.head,
        });

        match self.head {
            Some(old) => self.nodes[old].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        id
    }

    /// Добавляет значение в хвост списка.
    pub fn push_back(
        &mut self,
        value: T,
    ) -> NodeId {
        let id = self.nodes.insert(ListNode {
            value,
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(old) => self.nodes[old].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Вставляет значение после (`after = true`) или перед узлом `node`.
    /// `None`, если такого узла нет.
    pub fn insert_node(
        &mut self,
        node: NodeId,
        value: T,
        after: bool,
    ) -> Option<NodeId> {
        let anchor = self.nodes.get(node)?;
        let (prev, next) = if after {
            (Some(node), anchor.next)
        } else {
            (anchor.prev, Some(node))
        };

        let id = self.nodes.insert(ListNode { value, prev, next });

        match prev {
            Some(p) => self.nodes[p].next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(n) => self.nodes[n].prev = Some(id),
            None => self.tail = Some(id),
        }
        Some(id)
    }

    /// Удаляет узел и возвращает его значение.
    pub fn delete_node(
        &mut self,
        node: NodeId,
    ) -> Option<T> {
        let removed = self.nodes.remove(node)?;

        match removed.prev {
            Some(p) => self.nodes[p].next = removed.next,
            None => self.head = removed.next,
        }
        match removed.next {
            Some(n) => self.nodes[n].prev = removed.prev,
            None => self.tail = removed.prev,
        }
        Some(removed.value)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.delete_node(self.head?)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        self.delete_node(self.tail?)
    }

    /// Итератор по значениям в заданном направлении.
    pub fn iter(
        &self,
        direction: Direction,
    ) -> ListIter<'_, T> {
        ListIter {
            list: self,
            next: self.start(direction),
            direction,
            remaining: self.len(),
        }
    }

    /// Курсор, не заимствующий список.
    pub fn cursor(
        &self,
        direction: Direction,
    ) -> Cursor {
        Cursor {
            next: self.start(direction),
            direction,
        }
    }

    fn start(
        &self,
        direction: Direction,
    ) -> Option<NodeId> {
        match direction {
            Direction::FromHead => self.head,
            Direction::FromTail => self.tail,
        }
    }

    /// Копирует список, прогоняя каждое значение через `dup`.
    ///
    /// При первой ошибке возвращает её; частично собранная копия
    /// удаляется, оригинал не меняется.
    pub fn dup_with<E, F>(
        &self,
        mut dup: F,
    ) -> Result<List<T>, E>
    where
        F: FnMut(&T) -> Result<T, E>,
    {
        let mut copy = List::new();
        for value in self.iter(Direction::FromHead) {
            copy.push_back(dup(value)?);
        }
        Ok(copy)
    }

    /// Первый от головы узел, значение которого удовлетворяет `pred`.
    pub fn search_by<F>(
        &self,
        mut pred: F,
    ) -> Option<NodeId>
    where
        F: FnMut(&T) -> bool,
    {
        let mut cursor = self.cursor(Direction::FromHead);
        while let Some(id) = cursor.next(self) {
            if pred(&self.nodes[id].value) {
                return Some(id);
            }
        }
        None
    }

    /// Узел по индексу: 0 — голова, -1 — хвост, -2 — предпоследний и т.д.
    pub fn index(
        &self,
        index: i64,
    ) -> Option<NodeId> {
        let (mut node, mut steps, forward) = if index < 0 {
            (self.tail, (-(index + 1)) as u64, false)
        } else {
            (self.head, index as u64, true)
        };

        while steps > 0 {
            let cur = self.nodes.get(node?)?;
            node = if forward { cur.next } else { cur.prev };
            steps -= 1;
        }
        node
    }

    /// Переносит хвост в голову.
    pub fn rotate(&mut self) {
        if self.len() <= 1 {
            return;
        }
        if let Some(value) = self.pop_back() {
            self.push_front(value);
        }
    }
}

impl<T> List<T>
where
    T: PartialEq,
{
    /// Первый от головы узел со значением, равным `key`.
    pub fn search_key(
        &self,
        key: &T,
    ) -> Option<NodeId> {
        self.search_by(|v| v == key)
    }
}

impl Cursor {
    /// Следующий узел или `None` в конце списка.
    pub fn next<T>(
        &mut self,
        list: &List<T>,
    ) -> Option<NodeId> {
        let current = self.next?;
        let node = list.nodes.get(current)?;
        self.next = match self.direction {
            Direction::FromHead => node.next,
            Direction::FromTail => node.prev,
        };
        Some(current)
    }

    /// Возвращает курсор к голове, направление — от головы.
    pub fn rewind<T>(
        &mut self,
        list: &List<T>,
    ) {
        self.next = list.head;
        self.direction = Direction::FromHead;
    }

    /// Возвращает курсор к хвосту, направление — от хвоста.
    pub fn rewind_tail<T>(
        &mut self,
        list: &List<T>,
    ) {
        self.next = list.tail;
        self.direction = Direction::FromTail;
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для List
////////////////////////////////////////////////////////////////////////////////

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_list()
            .entries(self.iter(Direction::FromHead))
            .finish()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(
        &mut self,
        iter: I,
    ) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T> Iterator for ListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let node = list.nodes.get(self.next?)?;
        self.next = match self.direction {
            Direction::FromHead => node.next,
            Direction::FromTail => node.prev,
        };
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for ListIter<'_, T> {}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
