/// Sample prose shown until the host loads something else.
pub const DEFAULT_TEXT: &str = "\
Welcome to Glance. Each word appears on its own, in the same spot, so your eyes \
never have to travel across a line. One letter in every word is highlighted; it \
marks the point where recognition is fastest, and it always sits at the same place \
on screen.

Press play and the first few words arrive slowly before the reader settles into \
the speed you picked. Paragraph breaks add a short pause so the structure of the \
text is not lost. Images, code and tables stay on screen for a few seconds with a \
countdown before the words continue.

Jump back a sentence when something slips past you--press twice quickly to go one \
sentence further. Step word by word while paused, or change the pace at any time. \
Happy reading!";
