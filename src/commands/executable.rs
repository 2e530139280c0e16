use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

pub trait Executable {
    fn exec(self, store: &mut Store) -> Result<Frame, Error>;
}
