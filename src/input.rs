/// Input collaborator polled once per frame for block-edit actions.
pub trait EditInput {
    /// Edge-triggered "remove the block under the cursor" action.
    fn remove_pressed(&self) -> bool;
    /// Edge-triggered "place a block" action.
    fn add_pressed(&self) -> bool;
    fn modifier_down(&self) -> bool;
    fn cursor_locked(&self) -> bool;
    fn cursor_pos(&self) -> (f32, f32);
}
