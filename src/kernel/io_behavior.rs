/// A single I/O episode attached to a process.
///
/// The episode has two phases. While the owner executes, each instruction
/// counts down `ticks_until_generation`; once that reaches zero the request
/// is `generated`. While the owner sits in a blocked queue, each tick counts
/// down `remaining`; once that reaches zero the request is `satisfied` and
/// never fires again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoBehavior {
    ticks_until_generation: u32,
    ticks_to_satisfy: u32,
    remaining: u32,
    generated: bool,
    satisfied: bool,
}

impl IoBehavior {
    pub fn new(ticks_until_generation: u32, ticks_to_satisfy: u32) -> IoBehavior {
        IoBehavior {
            ticks_until_generation,
            ticks_to_satisfy,
            remaining: ticks_to_satisfy,
            generated: false,
            satisfied: false,
        }
    }

    /// Counts one executed instruction toward generation.
    /// Returns true on the instruction that generates the request.
    pub fn count_instruction(&mut self) -> bool {
        if self.generated || self.satisfied {
            return false;
        }

        self.ticks_until_generation = self.ticks_until_generation.saturating_sub(1);
        if self.ticks_until_generation == 0 {
            self.generated = true;
            return true;
        }

        false
    }

    /// Services one blocked tick. Returns true on the tick that satisfies the request.
    pub fn service(&mut self) -> bool {
        if !self.generated || self.satisfied {
            return false;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.satisfied = true;
            return true;
        }

        false
    }

    /// Generated but not yet satisfied.
    pub fn is_pending(&self) -> bool {
        self.generated && !self.satisfied
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    pub fn get_ticks_until_generation(&self) -> u32 {
        self.ticks_until_generation
    }

    pub fn get_ticks_to_satisfy(&self) -> u32 {
        self.ticks_to_satisfy
    }

    pub fn get_remaining(&self) -> u32 {
        self.remaining
    }
}
