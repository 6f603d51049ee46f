pub mod frequency;
pub mod observation_frame;
pub mod variable;
