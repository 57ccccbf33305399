use crate::error::GameError;

/// Read a little-endian 16-bit value at `counter`
pub fn get_le16(bytes: &[u8], counter: usize) -> Result<u16, GameError> {
    let ins_bytes = bytes
        .get(counter..counter + 2)
        .ok_or(GameError::Truncated {
            offset: counter,
            wanted: 2,
        })?;
    Ok(u16::from_le_bytes([ins_bytes[0], ins_bytes[1]]))
}

/// FileBuffer is a read cursor over the bytes of a data or string file
#[derive(Debug, Clone)]
pub struct FileBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FileBuffer<'a> {
    pub fn new(data: &'a [u8]) -> FileBuffer<'a> {
        FileBuffer { data, pos: 0 }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// seek moves the cursor; seeking past the end is an error
    pub fn seek(&mut self, pos: usize) -> Result<(), GameError> {
        if pos > self.data.len() {
            return Err(GameError::Truncated {
                offset: pos,
                wanted: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, count: usize) -> Result<(), GameError> {
        self.seek(self.pos + count)
    }

    pub fn read_u8(&mut self) -> Result<u8, GameError> {
        let b = *self.data.get(self.pos).ok_or(GameError::Truncated {
            offset: self.pos,
            wanted: 1,
        })?;
        self.pos += 1;
        Ok(b)
    }

    pub fn read_le16(&mut self) -> Result<u16, GameError> {
        let v = get_le16(self.data, self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], GameError> {
        let bytes = self
            .data
            .get(self.pos..self.pos + count)
            .ok_or(GameError::Truncated {
                offset: self.pos,
                wanted: count,
            })?;
        self.pos += count;
        Ok(bytes)
    }

    /// strlen counts the bytes up to the next NUL. The flag is true when
    /// the end of the buffer was hit before a NUL was found.
    pub fn strlen(&self) -> (usize, bool) {
        match self.data[self.pos.min(self.data.len())..]
            .iter()
            .position(|b| *b == 0)
        {
            Some(len) => (len, false),
            None => (self.data.len().saturating_sub(self.pos), true),
        }
    }

    /// remaining returns every byte from the cursor to the end of the buffer
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }
}
