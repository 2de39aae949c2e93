// Game action definitions

/// Represents every input the combat core reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement axes
    Left,
    Right,
    Up,
    Down,

    // Buttons
    Jump,
    Attack,
    Special,
    Dodge,
    Shield,
}

impl Action {
    /// Every action, in bit order
    pub const ALL: [Action; 9] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Attack,
        Action::Special,
        Action::Dodge,
        Action::Shield,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Compact set of actions, cheap to copy into a per-tick snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ActionSet(u16);

impl ActionSet {
    pub const EMPTY: ActionSet = ActionSet(0);

    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    pub fn with(mut self, action: Action) -> Self {
        self.insert(action);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Actions in `self` that are not in `other`
    pub fn difference(self, other: ActionSet) -> ActionSet {
        ActionSet(self.0 & !other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Action> {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::EMPTY;
        for action in iter {
            set.insert(action);
        }
        set
    }
}
