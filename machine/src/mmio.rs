/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Memory-mapped register access.
//!
//! All hardware access in this crate goes through `tock-registers` cells overlaid on a fixed
//! base address. The cells are width-typed (`u8`, `u16`, `u32`) and every `get`/`set` is a
//! single volatile access of exactly that width, never cached and never widened.

use core::{marker::PhantomData, ops};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Overlays a register block `T` on a physical (identity-mapped) address.
pub struct MMIODerefWrapper<T> {
    base_addr: usize,
    phantom: PhantomData<fn() -> T>,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl<T> MMIODerefWrapper<T> {
    /// Create an instance.
    ///
    /// # Safety
    ///
    /// You could specify any base address here, no checks. The address must stay valid for
    /// volatile accesses to the whole of `T` for the lifetime of the wrapper.
    pub const unsafe fn new(start_addr: usize) -> Self {
        Self {
            base_addr: start_addr,
            phantom: PhantomData,
        }
    }

    /// Address the block is overlaid on.
    pub const fn base_addr(&self) -> usize {
        self.base_addr
    }
}

/// Deref to RegisterBlock
///
/// Allows writing
/// ```ignore
/// self.registers.SYS_REG[2].get()
/// ```
/// instead of something along the lines of
/// ```ignore
/// unsafe { (*(CR_BASE as *const RegisterBlock)).SYS_REG[2].get() }
/// ```
impl<T> ops::Deref for MMIODerefWrapper<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*(self.base_addr as *const _) }
    }
}

// The wrapper only carries an address. Mutation through it is serialized by the owning driver's
// lock.
unsafe impl<T> Send for MMIODerefWrapper<T> {}
unsafe impl<T> Sync for MMIODerefWrapper<T> {}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        tock_registers::{
            interfaces::{Readable, Writeable},
            register_structs,
            registers::ReadWrite,
        },
    };

    register_structs! {
        #[allow(non_snake_case)]
        Mixed {
            (0x00 => Byte: ReadWrite<u8>),
            (0x01 => __reserved_0),
            (0x02 => Half: ReadWrite<u16>),
            (0x04 => Word: ReadWrite<u32>),
            (0x08 => @END),
        }
    }

    #[test]
    fn accesses_keep_declared_width() {
        let mut reg = [0u32; 2];
        let block = unsafe { MMIODerefWrapper::<Mixed>::new(&mut reg as *mut _ as usize) };

        block.Word.set(0xdead_beef);
        block.Byte.set(0xff);
        assert_eq!(block.Word.get(), 0xdead_beef);
        assert_eq!(block.Half.get(), 0);

        block.Half.set(0x1234);
        assert_eq!(block.Byte.get(), 0xff);
        assert_eq!(block.Word.get(), 0xdead_beef);
        assert_eq!(block.Half.get(), 0x1234);
    }
}
