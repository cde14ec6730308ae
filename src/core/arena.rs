use crate::domain::model::TechId;
use crate::domain::ports::Technology;
use std::ops::{Index, IndexMut};

/// Owner of every technology a vintage series refers to.
///
/// Series only hold [`TechId`] handles; the arena is never shrunk so a handle
/// stays valid for the arena's lifetime.
#[derive(Debug, Default)]
pub struct TechnologyArena {
    techs: Vec<Box<dyn Technology>>,
}

impl TechnologyArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tech: Box<dyn Technology>) -> TechId {
        let id = TechId(self.techs.len());
        self.techs.push(tech);
        id
    }

    /// Borrow `target` mutably and `source` immutably at the same time.
    /// Returns `None` when both handles point at the same technology.
    pub fn pair_mut(
        &mut self,
        target: TechId,
        source: TechId,
    ) -> Option<(&mut (dyn Technology + 'static), &dyn Technology)> {
        if target == source {
            return None;
        }

        if target.0 < source.0 {
            let (head, tail) = self.techs.split_at_mut(source.0);
            Some((head[target.0].as_mut(), tail[0].as_ref()))
        } else {
            let (head, tail) = self.techs.split_at_mut(target.0);
            Some((tail[0].as_mut(), head[source.0].as_ref()))
        }
    }

    pub fn len(&self) -> usize {
        self.techs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techs.is_empty()
    }
}

impl Index<TechId> for TechnologyArena {
    type Output = dyn Technology;

    fn index(&self, id: TechId) -> &Self::Output {
        self.techs[id.0].as_ref()
    }
}

impl IndexMut<TechId> for TechnologyArena {
    fn index_mut(&mut self, id: TechId) -> &mut Self::Output {
        self.techs[id.0].as_mut()
    }
}
